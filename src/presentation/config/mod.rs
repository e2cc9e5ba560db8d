mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, DEFAULT_JWT_SECRET, DatabaseBackend, DatabaseSettings, FeatureSettings,
    LoggingSettings, RateLimitSettings, ServerSettings, Settings, SettingsError,
};
