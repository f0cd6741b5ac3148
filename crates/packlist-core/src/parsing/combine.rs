use crate::catalog::descriptor::ModelDescriptor;
use crate::model::{BusinessChecks, CanonicalItem, ParsedPackingList, ParserModel};

/// Assemble the envelope for a matched model. Business checks are filled in
/// later by validation.
///
/// `registration_approval_number` is the model's own establishment number;
/// `establishment_numbers` holds every distinct number in the document.
pub fn combine(
    model: &ModelDescriptor,
    registration_approval_number: Option<String>,
    establishment_numbers: Vec<String>,
    items: Vec<CanonicalItem>,
    dispatch_location: Option<&str>,
) -> ParsedPackingList {
    ParsedPackingList {
        registration_approval_number,
        items,
        business_checks: BusinessChecks::default(),
        parser_model: ParserModel::Model(model.id.clone()),
        establishment_numbers,
        dispatch_location_number: dispatch_location.map(str::to_string),
        unit_in_header: model.find_unit_in_header,
        validate_country_of_origin: model.validate_country_of_origin,
    }
}

/// The envelope for a document no model could parse.
pub fn sentinel(parser_model: ParserModel, dispatch_location: Option<&str>) -> ParsedPackingList {
    ParsedPackingList {
        registration_approval_number: None,
        items: Vec::new(),
        business_checks: BusinessChecks {
            all_required_fields_present: false,
            failure_reasons: None,
        },
        parser_model,
        establishment_numbers: Vec::new(),
        dispatch_location_number: dispatch_location.map(str::to_string),
        unit_in_header: false,
        validate_country_of_origin: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::load_builtin;

    #[test]
    fn test_combine_records_model_and_flags() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("KESTREL1").unwrap();
        let list = combine(
            model,
            Some("RMS-GB-000040-002".into()),
            vec!["RMS-GB-000040-002".into(), "RMS-GB-000040-001".into()],
            Vec::new(),
            Some("DL-7"),
        );
        assert_eq!(list.registration_approval_number.as_deref(), Some("RMS-GB-000040-002"));
        assert_eq!(list.establishment_numbers.len(), 2);
        assert_eq!(list.parser_model, ParserModel::Model("KESTREL1".into()));
        assert_eq!(list.dispatch_location_number.as_deref(), Some("DL-7"));
        assert!(list.unit_in_header);
        assert!(list.validate_country_of_origin);
    }

    #[test]
    fn test_sentinel_envelope_is_empty_and_failing() {
        let list = sentinel(ParserModel::NoMatch, None);
        assert!(list.items.is_empty());
        assert!(!list.business_checks.all_required_fields_present);
        assert!(list.business_checks.failure_reasons.is_none());

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["parserModel"], "NOMATCH");
        assert!(json["dispatchLocationNumber"].is_null());
    }
}
