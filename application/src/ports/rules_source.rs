//! Source of legislation rules for `reload-legislation`.

use eunomia_domain::LegislationRules;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesSourceError {
    #[error("Failed to load rules: {0}")]
    Load(String),

    #[error("Invalid rules: {0}")]
    Invalid(String),
}

/// Re-reads legislation rules on demand.
pub trait RulesSource: Send + Sync {
    fn load(&self) -> Result<LegislationRules, RulesSourceError>;
}

/// Always yields the same rules.
pub struct FixedRules(pub LegislationRules);

impl RulesSource for FixedRules {
    fn load(&self) -> Result<LegislationRules, RulesSourceError> {
        Ok(self.0)
    }
}
