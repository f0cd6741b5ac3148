use crate::catalog::descriptor::ModelCatalog;
use crate::catalog::parse_catalog_str;
use crate::error::PacklistError;

const MODELS_JSON: &str = include_str!("../../../../rules/models.json");

/// The built-in model catalog shipped with the crate.
pub fn load_builtin() -> Result<ModelCatalog, PacklistError> {
    parse_catalog_str(MODELS_JSON)
}

impl ModelCatalog {
    pub fn builtin() -> Result<ModelCatalog, PacklistError> {
        load_builtin()
    }
}
