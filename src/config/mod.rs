//! Configuration loading for VenueSender

pub mod paths;
pub mod settings;

pub use paths::resolve_config_path;
pub use settings::{Settings, SmtpSettings};
