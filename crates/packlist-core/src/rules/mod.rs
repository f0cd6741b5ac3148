pub mod builtin;
pub mod schema;

use crate::error::PacklistError;
use schema::{IneligibilityRule, RuleSetDef};
use std::collections::HashSet;
use std::path::Path;

/// Ineligibility rules plus the ISO country list used to check origins.
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    pub name: String,
    pub version: String,
    pub rules: Vec<IneligibilityRule>,
    iso_codes: HashSet<String>,
}

impl RuleCatalog {
    pub fn new(ruleset: RuleSetDef, iso_codes: Vec<String>) -> Result<RuleCatalog, PacklistError> {
        let iso_codes: HashSet<String> = iso_codes
            .into_iter()
            .map(|c| c.trim().to_ascii_uppercase())
            .collect();
        validate_ruleset(&ruleset, &iso_codes)?;
        Ok(RuleCatalog {
            name: ruleset.name,
            version: ruleset.version,
            rules: ruleset.rules,
            iso_codes,
        })
    }

    pub fn is_iso_code(&self, code: &str) -> bool {
        self.iso_codes.contains(&code.trim().to_ascii_uppercase())
    }

    /// Every rule whose country equals `country` and whose commodity prefix
    /// starts `commodity_code`.
    pub fn matching_rules<'a>(
        &'a self,
        country: &'a str,
        commodity_code: &'a str,
    ) -> impl Iterator<Item = &'a IneligibilityRule> + 'a {
        self.rules.iter().filter(move |r| {
            r.country_of_origin.eq_ignore_ascii_case(country.trim())
                && commodity_code.starts_with(r.commodity_code.as_str())
        })
    }
}

/// Load an ineligibility ruleset from a JSON file, using the built-in ISO list.
pub fn load_rules(path: &Path) -> Result<RuleCatalog, PacklistError> {
    let content = std::fs::read_to_string(path).map_err(|e| PacklistError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let ruleset: RuleSetDef =
        serde_json::from_str(&content).map_err(|e| PacklistError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    RuleCatalog::new(ruleset, builtin::iso_codes()?)
}

/// Parse an ineligibility ruleset from a JSON string (no file path context).
pub fn parse_rules_str(json: &str) -> Result<RuleCatalog, PacklistError> {
    let ruleset: RuleSetDef = serde_json::from_str(json)?;
    RuleCatalog::new(ruleset, builtin::iso_codes()?)
}

/// Validate that a ruleset is well-formed.
pub fn validate_ruleset(
    ruleset: &RuleSetDef,
    iso_codes: &HashSet<String>,
) -> Result<(), PacklistError> {
    if iso_codes.is_empty() {
        return Err(PacklistError::CatalogInvalid(
            "ISO country list must not be empty".into(),
        ));
    }

    for rule in &ruleset.rules {
        let country = rule.country_of_origin.trim();
        if !iso_codes.contains(country) {
            return Err(PacklistError::CatalogInvalid(format!(
                "rule country '{}' is not an upper-case ISO 3166-1 alpha-2 code",
                rule.country_of_origin
            )));
        }

        if rule.commodity_code.is_empty()
            || !rule.commodity_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PacklistError::CatalogInvalid(format!(
                "rule {}/{}: commodity code prefix must be digits",
                rule.country_of_origin, rule.commodity_code
            )));
        }

        if let Some(treatment) = &rule.type_of_treatment {
            if treatment.trim().is_empty() {
                return Err(PacklistError::CatalogInvalid(format!(
                    "rule {}/{}: use null rather than an empty treatment",
                    rule.country_of_origin, rule.commodity_code
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_rules() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "rules": [
                { "country_of_origin": "CN", "commodity_code": "0207" },
                { "country_of_origin": "AR", "commodity_code": "0406", "type_of_treatment": "!Processed" }
            ]
        }"#;
        let rules = parse_rules_str(json).unwrap();
        assert_eq!(rules.rules.len(), 2);
        assert!(rules.rules[1].is_exception());
        assert_eq!(rules.rules[1].exception(), Some("Processed"));
        assert!(rules.is_iso_code("gb"));
    }

    #[test]
    fn test_unknown_country_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "rules": [{ "country_of_origin": "ZZ", "commodity_code": "0207" }]
        }"#;
        assert!(parse_rules_str(json).is_err());
    }

    #[test]
    fn test_non_digit_prefix_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "rules": [{ "country_of_origin": "CN", "commodity_code": "02A7" }]
        }"#;
        assert!(parse_rules_str(json).is_err());
    }

    #[test]
    fn test_matching_rules_by_prefix() {
        let json = r#"{
            "name": "Test", "version": "1.0",
            "rules": [
                { "country_of_origin": "CN", "commodity_code": "0207" },
                { "country_of_origin": "CN", "commodity_code": "0303" }
            ]
        }"#;
        let rules = parse_rules_str(json).unwrap();
        assert_eq!(rules.matching_rules("CN", "0207141000").count(), 1);
        assert_eq!(rules.matching_rules("cn", "0207141000").count(), 1);
        assert_eq!(rules.matching_rules("FR", "0207141000").count(), 0);
        assert_eq!(rules.matching_rules("CN", "0201").count(), 0);
    }
}
