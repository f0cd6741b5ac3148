use crate::error::PacklistError;
use crate::rules::schema::RuleSetDef;
use crate::rules::RuleCatalog;

const INELIGIBLE_ITEMS_JSON: &str = include_str!("../../../../rules/ineligible-items.json");
const ISO_CODES_JSON: &str = include_str!("../../../../rules/iso-codes.json");

/// The built-in ISO 3166-1 alpha-2 country list.
pub fn iso_codes() -> Result<Vec<String>, PacklistError> {
    let codes: Vec<String> = serde_json::from_str(ISO_CODES_JSON)?;
    Ok(codes)
}

/// The built-in ineligibility ruleset.
pub fn load_builtin() -> Result<RuleCatalog, PacklistError> {
    let ruleset: RuleSetDef = serde_json::from_str(INELIGIBLE_ITEMS_JSON)?;
    RuleCatalog::new(ruleset, iso_codes()?)
}

impl RuleCatalog {
    pub fn builtin() -> Result<RuleCatalog, PacklistError> {
        load_builtin()
    }
}
