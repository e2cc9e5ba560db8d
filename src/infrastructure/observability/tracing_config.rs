/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Base filter directive, used when `RUST_LOG` is unset.
    pub level: String,
}

impl TracingConfig {
    pub fn default_filter(&self) -> String {
        format!("{},imaginarium=debug,tower_http=debug", self.level)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_keeps_crate_and_http_at_debug() {
        let config = TracingConfig {
            environment: "test".to_string(),
            json_format: false,
            level: "warn".to_string(),
        };

        assert_eq!(
            config.default_filter(),
            "warn,imaginarium=debug,tower_http=debug"
        );
    }
}
