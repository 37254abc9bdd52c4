// Settings service module
// Grid settings persisted as TOML in the platform config directory

mod service;

pub use service::{SettingsService, CONFIG_ENV_VAR};
