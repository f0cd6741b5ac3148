use packlist_core::matching::Disposition;
use packlist_core::model::{CanonicalItem, Quantity};
use packlist_core::ProcessedPackingList;
use std::fmt::Write;

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn quantity(value: Option<&Quantity>) -> String {
    value.map_or_else(|| "-".to_string(), Quantity::to_string)
}

/// Human-readable rendering of a processed packing list.
pub fn format_result(result: &ProcessedPackingList) -> String {
    let list = &result.packing_list;
    let mut out = String::new();

    let _ = writeln!(out, "Model:        {}", list.parser_model);
    match &result.disposition {
        Disposition::Parsed { .. } => {}
        Disposition::NoMatch { .. } => {
            let _ = writeln!(out, "Status:       no layout matched");
        }
        Disposition::Fault { reason } => {
            let _ = writeln!(out, "Status:       failed ({reason})");
        }
    }
    let _ = writeln!(
        out,
        "Establishment: {}",
        text(list.registration_approval_number.as_deref())
    );
    if list.establishment_numbers.len() > 1 {
        let _ = writeln!(out, "  all found:  {}", list.establishment_numbers.join(", "));
    }
    if let Some(tag) = &list.dispatch_location_number {
        let _ = writeln!(out, "Dispatch:     {tag}");
    }
    let _ = writeln!(out);

    if !list.items.is_empty() {
        format_items(&mut out, &list.items);
        let _ = writeln!(out);
    }

    if list.business_checks.all_required_fields_present {
        let _ = writeln!(out, "Result: PASS ({} items)", list.items.len());
    } else {
        let _ = writeln!(out, "Result: FAIL");
        if let Some(reasons) = &list.business_checks.failure_reasons {
            for line in reasons.lines() {
                let _ = writeln!(out, "  - {line}");
            }
        }
    }

    out
}

fn format_items(out: &mut String, items: &[CanonicalItem]) {
    let max_desc = items
        .iter()
        .map(|i| text(i.description.as_deref()).len())
        .max()
        .unwrap_or(11)
        .clamp(11, 40);

    let _ = writeln!(
        out,
        "  {:<22}  {:<width$}  {:<12}  {:>8}  {:>10}  {:<5}  {:<7}  {:<10}",
        "Location",
        "Description",
        "Commodity",
        "Packages",
        "Net weight",
        "Unit",
        "Origin",
        "NIRMS",
        width = max_desc
    );
    let _ = writeln!(out, "  {}", "-".repeat(max_desc + 92));

    for item in items {
        let desc: String = text(item.description.as_deref())
            .chars()
            .take(max_desc)
            .collect();
        let _ = writeln!(
            out,
            "  {:<22}  {:<width$}  {:<12}  {:>8}  {:>10}  {:<5}  {:<7}  {:<10}",
            item.row_location.to_string(),
            desc,
            text(item.commodity_code.as_deref()),
            quantity(item.number_of_packages.as_ref()),
            quantity(item.total_net_weight_kg.as_ref()),
            text(item.total_net_weight_unit.as_deref()),
            text(item.country_of_origin.as_deref()),
            text(item.nirms.as_deref()),
            width = max_desc
        );
    }
}
