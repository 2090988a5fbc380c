//! Legislation rules re-read from the configuration files.

use super::file_config::FileConfig;
use super::loader::ConfigLoader;
use eunomia_application::{RulesSource, RulesSourceError};
use eunomia_domain::LegislationRules;
use std::path::PathBuf;
use tracing::debug;

/// Reloads `[legislation]` from the same sources used at startup.
pub struct ConfigRulesSource {
    config_path: Option<PathBuf>,
    use_files: bool,
}

impl ConfigRulesSource {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            use_files: true,
        }
    }

    /// Source for `--no-config`: always the built-in defaults.
    pub fn defaults_only() -> Self {
        Self {
            config_path: None,
            use_files: false,
        }
    }

    fn load_config(&self) -> Result<FileConfig, RulesSourceError> {
        if !self.use_files {
            return Ok(ConfigLoader::load_defaults());
        }
        ConfigLoader::load(self.config_path.as_deref())
            .map_err(|e| RulesSourceError::Load(e.to_string()))
    }
}

impl RulesSource for ConfigRulesSource {
    fn load(&self) -> Result<LegislationRules, RulesSourceError> {
        let config = self.load_config()?;
        let (rules, issues) = config.legislation.to_rules();
        debug!("Reloaded [legislation] with {} issue(s)", issues.len());
        rules.ok_or_else(|| {
            let messages: Vec<_> = issues
                .iter()
                .filter(|issue| issue.is_error())
                .map(|issue| issue.message.as_str())
                .collect();
            RulesSourceError::Invalid(messages.join("; "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reload_reads_current_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eunomia.toml");
        fs::write(&path, "[legislation]\nvote_threshold = 2\n").unwrap();

        let source = ConfigRulesSource::new(Some(path.clone()));
        assert_eq!(source.load().unwrap().vote_threshold, 2);

        fs::write(&path, "[legislation]\nvote_threshold = 7\ncontext_window = 10\n").unwrap();
        let rules = source.load().unwrap();
        assert_eq!(rules.vote_threshold, 7);
        assert_eq!(rules.context_window, 10);
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eunomia.toml");
        fs::write(&path, "[legislation]\nvote_threshold = 0\n").unwrap();

        let err = ConfigRulesSource::new(Some(path)).load().unwrap_err();
        assert!(err.to_string().contains("legislation.vote_threshold"));
    }

    #[test]
    fn test_defaults_only() {
        let rules = ConfigRulesSource::defaults_only().load().unwrap();
        assert_eq!(rules, LegislationRules::default());
    }
}
