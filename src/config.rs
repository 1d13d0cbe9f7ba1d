//! Environment-based service configuration.

use crate::error::ConfigError;

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_host: String,
    pub bind_port: u16,
    /// OAuth access token attached as the bearer credential on every
    /// mail provider call.
    pub access_token: String,
    pub aws_region: String,
    /// Endpoint override for LocalStack-style local stacks. When set,
    /// static test credentials are used for both store clients.
    pub aws_endpoint_url: Option<String>,
    /// S3 bucket receiving snapshot documents.
    pub bucket_name: String,
    /// DynamoDB table receiving header index rows.
    pub headers_table: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `ACCESS_TOKEN` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = std::env::var("ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("ACCESS_TOKEN".into()))?;

        let bind_host =
            std::env::var("MAIL_INGEST_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let bind_port: u16 = match std::env::var("MAIL_INGEST_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAIL_INGEST_PORT".into(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => 8080,
        };

        let aws_region =
            std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let aws_endpoint_url = std::env::var("AWS_ENDPOINT_URL").ok();

        let bucket_name =
            std::env::var("MAIL_INGEST_BUCKET").unwrap_or_else(|_| "sample-bucket".to_string());

        let headers_table =
            std::env::var("MAIL_INGEST_TABLE").unwrap_or_else(|_| "gmail-headers".to_string());

        let config = Self {
            bind_host,
            bind_port,
            access_token,
            aws_region,
            aws_endpoint_url,
            bucket_name,
            headers_table,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ACCESS_TOKEN".into(),
                message: "must not be empty".into(),
            });
        }
        if self.bucket_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "MAIL_INGEST_BUCKET".into(),
                message: "must not be empty".into(),
            });
        }
        if self.headers_table.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "MAIL_INGEST_TABLE".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.bind_port)
    }
}
