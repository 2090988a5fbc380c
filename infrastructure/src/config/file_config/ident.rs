//! Identification configuration from TOML (`[ident]` section)

use eunomia_application::Identity;
use eunomia_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

const VALID_METHODS: &[&str] = &["none", "nickserv"];

/// Raw identification configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIdentConfig {
    /// `none` or `nickserv`
    pub method: String,
    /// Account name; defaults to the configured nick
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for FileIdentConfig {
    fn default() -> Self {
        Self {
            method: "none".to_string(),
            username: None,
            password: None,
        }
    }
}

impl FileIdentConfig {
    /// Resolve to an [`Identity`], falling back to `nick` for the username.
    ///
    /// Returns the identity along with any issues found.
    pub fn to_identity(&self, nick: &str) -> (Identity, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let method = self.method.trim().to_lowercase();

        let identity = match method.as_str() {
            "none" | "" => Identity::None,
            "nickserv" => {
                let password = self.password.clone().unwrap_or_default();
                if password.is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MissingPassword,
                        "ident.password: required when ident.method = \"nickserv\"",
                    ));
                }
                Identity::NickServ {
                    username: self
                        .username
                        .clone()
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| nick.to_string()),
                    password,
                }
            }
            other => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "ident.method".to_string(),
                        value: other.to_string(),
                        valid_values: VALID_METHODS.iter().map(|s| s.to_string()).collect(),
                    },
                    format!(
                        "ident.method: unknown value '{}', identification will be skipped",
                        other
                    ),
                ));
                Identity::Unsupported(other.to_string())
            }
        };

        (identity, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickserv_defaults_username_to_nick() {
        let config = FileIdentConfig {
            method: "NickServ".to_string(),
            username: None,
            password: Some("hunter2".to_string()),
        };
        let (identity, issues) = config.to_identity("eunomia");
        assert!(issues.is_empty());
        assert_eq!(
            identity,
            Identity::NickServ {
                username: "eunomia".to_string(),
                password: "hunter2".to_string(),
            }
        );
    }

    #[test]
    fn test_nickserv_without_password_is_an_error() {
        let config = FileIdentConfig {
            method: "nickserv".to_string(),
            ..Default::default()
        };
        let (_, issues) = config.to_identity("eunomia");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::MissingPassword);
    }

    #[test]
    fn test_unknown_method_is_a_warning() {
        let config = FileIdentConfig {
            method: "sasl".to_string(),
            ..Default::default()
        };
        let (identity, issues) = config.to_identity("eunomia");
        assert_eq!(identity, Identity::Unsupported("sasl".to_string()));
        assert!(!issues[0].is_error());
    }
}
