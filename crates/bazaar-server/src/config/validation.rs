//! Configuration validation.

use super::types::ServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JWT secret: must be at least 32 characters")]
    InvalidJwtSecret,

    #[error("Invalid token lifetime: must be greater than zero")]
    InvalidTokenTtl,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid upload limit: must be greater than zero")]
    InvalidUploadLimit,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

/// Validate server configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.auth.jwt_secret.len() < 32 {
        errors.push(ConfigError::InvalidJwtSecret);
    }

    if config.auth.token_ttl_secs == 0 {
        errors.push(ConfigError::InvalidTokenTtl);
    }

    if config.database.url.is_empty() {
        errors.push(ConfigError::InvalidDatabaseUrl);
    }

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if config.uploads.max_file_bytes == 0 {
        errors.push(ConfigError::InvalidUploadLimit);
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    use super::types::*;

    ServerConfig {
        server: ServerBindConfig {
            host: "127.0.0.1".to_string(),
            port: 3003,
            request_timeout_secs: 30,
            body_limit_bytes: 10 * 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 10,
            run_migrations: true,
        },
        auth: AuthConfig {
            jwt_secret: "a".repeat(32),
            token_ttl_secs: 86400,
        },
        uploads: UploadConfig {
            directory: std::env::temp_dir().join("bazaar-test-uploads"),
            max_file_bytes: 1024,
        },
        logging: LoggingConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_jwt_secret() {
        let mut config = test_config();
        config.auth.jwt_secret = "short".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidJwtSecret)));
    }

    #[test]
    fn test_zero_token_ttl() {
        let mut config = test_config();
        config.auth.token_ttl_secs = 0;

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidTokenTtl)));
    }

    #[test]
    fn test_invalid_database_url() {
        let mut config = test_config();
        config.database.url = "".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidDatabaseUrl)));
    }

    #[test]
    fn test_invalid_port() {
        let mut config = test_config();
        config.server.port = 0;

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidPort(0))));
    }

    #[test]
    fn test_invalid_logging() {
        let mut config = test_config();
        config.logging.level = "loud".to_string();
        config.logging.format = "xml".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidLogLevel(_))));
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidLogFormat(_))));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = test_config();
        config.auth.jwt_secret.clear();
        config.uploads.max_file_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&test_config()).is_ok());
    }
}
