//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain and application
//! types where appropriate.

mod ident;
mod irc;
mod legislation;
mod logging;

pub use ident::FileIdentConfig;
pub use irc::FileIrcConfig;
pub use legislation::FileLegislationConfig;
pub use logging::FileLoggingConfig;

use eunomia_application::BotParams;
use eunomia_domain::{ConfigIssue, ConfigIssueCode, LegislationRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when the configuration has error-severity issues
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Connection settings
    pub irc: FileIrcConfig,
    /// Services identification
    pub ident: FileIdentConfig,
    /// Voting rules
    pub legislation: FileLegislationConfig,
    /// Log locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Required connection fields
        for (field, value) in [
            ("irc.server", &self.irc.server),
            ("irc.channel", &self.irc.channel),
            ("irc.nick", &self.irc.nick),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyField {
                        field: field.to_string(),
                    },
                    format!("{}: cannot be empty", field),
                ));
            }
        }

        if self.irc.port == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "irc.port".to_string(),
                    value: 0,
                },
                "irc.port: cannot be 0",
            ));
        }

        let channel = self.irc.channel.trim();
        if !channel.is_empty() && !channel.starts_with(['#', '&', '+', '!']) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "irc.channel".to_string(),
                    value: channel.to_string(),
                    valid_values: vec!["#name".to_string(), "&name".to_string()],
                },
                format!("irc.channel: '{}' does not look like a channel name", channel),
            ));
        }

        // 2. Identification
        issues.extend(self.ident.to_identity(&self.irc.nick).1);

        // 3. Legislation rules
        issues.extend(self.legislation.to_rules().1);

        issues
    }

    /// Fail on error-severity issues; warnings are returned for display.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError { issues: errors })
        }
    }

    /// Legislation rules, falling back to defaults for invalid values.
    pub fn rules(&self) -> LegislationRules {
        self.legislation.to_rules().0.unwrap_or_default()
    }

    pub fn bot_params(&self) -> BotParams {
        BotParams::new(self.irc.channel.trim(), self.irc.nick.trim())
            .with_identity(self.ident.to_identity(&self.irc.nick).0)
            .with_announce(self.legislation.announce)
    }
}
