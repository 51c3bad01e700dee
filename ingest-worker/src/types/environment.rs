//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use screenshot_storage::queue::QueueConfig;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the screenshot table name
    ///
    /// # Panics
    ///
    /// Panics if the `TABLE_NAME` environment variable is not set outside of
    /// development
    #[must_use]
    pub fn table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("TABLE_NAME").expect("TABLE_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("TABLE_NAME").unwrap_or_else(|_| "screenshot-records".to_string())
            }
        }
    }

    /// Returns the notification queue URL
    ///
    /// # Panics
    ///
    /// Panics if the `QUEUE_URL` environment variable is not set outside of
    /// development
    #[must_use]
    pub fn queue_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("QUEUE_URL").expect("QUEUE_URL environment variable is not set")
            }
            Self::Development => env::var("QUEUE_URL").unwrap_or_else(|_| {
                "http://localhost:4566/000000000000/screenshot-events".to_string()
            }),
        }
    }

    /// Returns the region recorded in `s3Location`
    #[must_use]
    pub fn region(&self) -> String {
        env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string())
    }

    /// Notification queue consumption parameters
    #[must_use]
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            queue_url: self.queue_url(),
            default_max_messages: 10,
            default_visibility_timeout: 30,
            default_wait_time_seconds: 20,
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }
}
