// ABOUTME: Tracing subscriber setup for the API library and the admin CLI
// ABOUTME: Configures log levels, output formats, and noise reduction for the tracing subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging with `tracing`

use std::env;
use std::io;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::service_names;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base filter, e.g. `info` or `setbook_api=debug`
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Emit file and line of each event
    pub include_location: bool,
    /// Reported as `service.name`
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Subscriber output style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable multi-field lines
    Pretty,
    /// Compact format for CLI output
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: service_names::SETBOOK_API.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT` and `SERVICE_NAME`
    #[must_use]
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: env::var("LOG_FORMAT")
                .map(|value| LogFormat::from_str_or_default(&value))
                .unwrap_or(if is_production {
                    LogFormat::Json
                } else {
                    LogFormat::Pretty
                }),
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::SETBOOK_API.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Build the filter, always applying noise reduction for chatty dependencies
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let directives = [
            "hyper=warn".to_owned(),
            "reqwest=warn".to_owned(),
            "sqlx=warn".to_owned(),
            format!("setbook_api={}", self.level),
        ];

        directives
            .iter()
            .fold(EnvFilter::new(&self.level), |filter, directive| {
                filter.add_directive(
                    directive
                        .parse()
                        .unwrap_or_else(|_| Level::INFO.into()),
                )
            })
    }

    /// Install this configuration as the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber was already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .json();
                registry.with(layer).try_init()?;
            }
            LogFormat::Pretty => {
                let layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout);
                registry.with(layer).try_init()?;
            }
            LogFormat::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr);
                registry.with(layer).try_init()?;
            }
        }

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );

        Ok(())
    }
}

/// Install a subscriber configured from the environment
///
/// # Errors
///
/// Returns an error if a subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
