//! Raw providers backed by the process environment and configuration files.

pub mod environment;
pub mod file;

pub use environment::{ENVIRONMENT_SOURCE_NAME, EnvironmentProvider};
pub use file::{FileFormat, file_source_name, load_file};
