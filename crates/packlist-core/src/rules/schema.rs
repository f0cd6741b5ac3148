use serde::{Deserialize, Serialize};

/// An ineligibility rule catalog as stored in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub rules: Vec<IneligibilityRule>,
}

/// A country + commodity code prefix (+ treatment) combination that is not
/// allowed under NIRMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IneligibilityRule {
    /// ISO 3166-1 alpha-2 code.
    pub country_of_origin: String,
    /// Matches any commodity code that starts with these digits.
    pub commodity_code: String,
    /// `None` makes every treatment ineligible. A leading `!` turns the rule
    /// into an exception: only the named treatment is allowed.
    #[serde(default)]
    pub type_of_treatment: Option<String>,
}

impl IneligibilityRule {
    /// The carved-out treatment, if this is an exception rule.
    pub fn exception(&self) -> Option<&str> {
        self.type_of_treatment
            .as_deref()
            .and_then(|t| t.strip_prefix('!'))
    }

    pub fn is_exception(&self) -> bool {
        self.exception().is_some()
    }
}
