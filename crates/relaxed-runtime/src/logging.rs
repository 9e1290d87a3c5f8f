//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Settings are read through the resolution engine itself, so `logging.level`
//! may come from `application.toml`, `LOGGING_LEVEL` in the environment or a
//! programmatic default alike.
//!
//! # Resolver-Based Initialization
//!
//! ```rust,ignore
//! use relaxed_core::Resolver;
//! use relaxed_runtime::{EnvironmentLoader, logging};
//!
//! let chain = EnvironmentLoader::new().load()?;
//! logging::init_from_resolver(&Resolver::new(&chain));
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! use relaxed_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("relaxed_core=debug")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use relaxed_core::{PropertyName, Resolver};
use serde::{Deserialize, Serialize};
use tracing::{Level, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single line, abbreviated.
    #[default]
    Compact,
    /// Single line, with every field.
    Full,
    /// Multi line, human oriented.
    Pretty,
    /// Newline delimited JSON (requires the `json-log` feature).
    #[cfg(feature = "json-log")]
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            "pretty" => Ok(Self::Pretty),
            #[cfg(feature = "json-log")]
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// The file named by `logging.file-path`.
    File,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            other => Err(format!("unknown log output '{other}'")),
        }
    }
}

/// Logging settings as resolved from a source chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Maximum level, from `logging.level`. Defaults to `info`.
    pub level: Level,
    /// Output format, from `logging.format`.
    pub format: LogFormat,
    /// Log destination, from `logging.output`.
    pub output: LogOutput,
    /// Log file used by [`LogOutput::File`], from `logging.file-path`.
    pub file_path: Option<PathBuf>,
    /// Extra `EnvFilter` directives such as `relaxed_core=trace`, from
    /// `logging.directives[N]`.
    pub directives: Vec<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            directives: Vec::new(),
        }
    }
}

impl LoggingSettings {
    /// Reads `logging.level`, `logging.format`, `logging.output`,
    /// `logging.file-path` and `logging.directives[N]`.
    ///
    /// Unparseable values are reported and replaced by their defaults.
    pub fn from_resolver(resolver: &Resolver<'_>) -> Self {
        let mut settings = Self::default();
        let Ok(root) = PropertyName::parse("logging") else {
            return settings;
        };
        let text = |element: &str| -> Option<String> {
            let name = root.append(element).ok()?;
            resolver.resolve(&name).map(|p| p.value().to_string())
        };

        if let Some(level) = text("level") {
            settings.level = parse_or_warn("logging.level", &level, settings.level);
        }
        if let Some(format) = text("format") {
            settings.format = parse_or_warn("logging.format", &format, settings.format);
        }
        if let Some(output) = text("output") {
            settings.output = parse_or_warn("logging.output", &output, settings.output);
        }
        settings.file_path = text("file-path").map(PathBuf::from);

        if let Ok(directives) = root.append("directives") {
            for index in 0.. {
                match resolver.resolve(&directives.append_index(index)) {
                    Some(property) => settings.directives.push(property.value().to_string()),
                    None => break,
                }
            }
        }
        settings
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    value.parse().unwrap_or_else(|error| {
        warn!(key, value, %error, "Invalid logging setting, using default");
        default
    })
}

/// Initializes logging from settings resolved through `resolver`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_resolver(resolver: &Resolver<'_>) {
    let settings = LoggingSettings::from_resolver(resolver);
    let _ = LoggingBuilder::from_settings(&settings).try_init();
}

/// A builder for configuring logging.
///
/// # Example
///
/// ```rust,ignore
/// use relaxed_runtime::logging::{LogFormat, LoggingBuilder};
/// use tracing::Level;
///
/// LoggingBuilder::new()
///     .with_level(Level::DEBUG)
///     .format(LogFormat::Pretty)
///     .with_thread_ids(true)
///     .init();
/// ```
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<Level>,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Create a builder from resolved settings.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let mut builder = Self::new()
            .with_level(settings.level)
            .format(settings.format)
            .output(settings.output);
        builder.file_path.clone_from(&settings.file_path);
        builder.directives.extend(settings.directives.iter().cloned());
        builder
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add a filter directive such as `relaxed_core=trace`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Include file names in log output.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// Include line numbers in log output.
    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// Set file path for file output.
    pub fn file_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    /// Build the filter from directives. `RUST_LOG` wins over the level.
    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(error) => warn!(directive, %error, "Ignoring invalid log directive"),
            }
        }

        filter
    }

    /// Initialize the logging system.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_target(self.with_target)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match &self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => {
                        let layer = fmt::layer().json().with_writer($writer);
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Compact => {
                        let layer = configure_layer!(fmt::layer().compact().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Full => {
                        let layer = configure_layer!(fmt::layer().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Pretty => {
                        let layer = configure_layer!(fmt::layer().pretty().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                }
            };
        }

        match &self.output {
            LogOutput::Stdout => init_with_writer!(std::io::stdout),
            LogOutput::Stderr => init_with_writer!(std::io::stderr),
            LogOutput::File => {
                if let Some(path) = &self.file_path {
                    let file_appender = tracing_appender::rolling::never(
                        path.parent().unwrap_or_else(|| Path::new(".")),
                        path.file_name().unwrap_or_else(|| OsStr::new("relaxed.log")),
                    );
                    init_with_writer!(file_appender)
                } else {
                    warn!(
                        "File output requested but no file path configured, falling back to stdout"
                    );
                    init_with_writer!(std::io::stdout)
                }
            }
        }
    }
}
