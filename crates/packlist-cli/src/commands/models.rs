use packlist_core::catalog::{self, descriptor::ModelCatalog};
use packlist_core::error::PacklistError;
use std::path::Path;

fn load(models: Option<&Path>) -> Result<ModelCatalog, PacklistError> {
    match models {
        Some(path) => catalog::load_catalog(path),
        None => ModelCatalog::builtin(),
    }
}

pub fn list(models: Option<&Path>) -> Result<(), PacklistError> {
    let catalog = load(models)?;
    println!("{} (v{}), in dispatch order:\n", catalog.name, catalog.version);
    for model in catalog.models() {
        let status = if model.deprecated { " [deprecated]" } else { "" };
        println!("  {:<12} {:<12}{}", model.id, model.format.to_string(), status);
        if let Some(desc) = &model.description {
            println!("               {desc}");
        }
    }
    Ok(())
}

pub fn explain(id: &str, models: Option<&Path>) -> Result<(), PacklistError> {
    let catalog = load(models)?;
    let model = catalog.get(id).ok_or_else(|| {
        PacklistError::CatalogInvalid(format!("no model '{id}' in {}", catalog.name))
    })?;

    println!("{} ({})\n", model.id, model.format);
    if let Some(desc) = &model.description {
        println!("{desc}\n");
    }
    if model.deprecated {
        println!("Deprecated: never selected during dispatch.\n");
    }
    println!("Establishment number: /{}/", model.establishment_number.as_str());
    println!();

    println!("Fields:");
    for field in &model.fields {
        let required = if field.optional { "optional" } else { "required" };
        print!("  {:<22} /{}/ ({required})", field.field.to_string(), field.header.as_str());
        if let Some((min, max)) = field.x_range {
            print!("  x {min}..{max}");
        }
        if let Some(value) = &field.value {
            print!("  value /{}/", value.as_str());
        }
        println!();
    }
    println!();

    if let Some(g) = &model.geometry {
        println!(
            "Header band: y {}..{}, rows need at least {} cells",
            g.min_headers_y, g.max_headers_y, g.min_row_cells
        );
        if let Some(footer) = &g.footer {
            println!("Footer: /{}/", footer.as_str());
        }
        if let Some(marker) = &g.page_marker {
            println!("Continuation page marker: /{}/", marker.as_str());
        }
        println!();
    }

    if model.validate_country_of_origin {
        println!("Validates NIRMS status, country of origin and ineligible items.");
    }
    if model.find_unit_in_header {
        println!("Net weight unit is read from the weight column header.");
    }
    if let Some(blanket) = &model.blanket_nirms {
        println!(
            "Blank NIRMS cells become '{}' when /{}/ appears in the document.",
            blanket.value,
            blanket.pattern.as_str()
        );
    }
    if !model.invalid_sheets.is_empty() {
        println!("Ignored sheets: {}", model.invalid_sheets.join(", "));
    }

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), PacklistError> {
    let catalog = catalog::load_catalog(file)?;

    println!("Catalog '{}' (v{}) is valid.", catalog.name, catalog.version);
    println!(
        "  Models: {} ({} active)",
        catalog.models().len(),
        catalog.dispatch_order().count()
    );

    // Overlapping establishment patterns are legal but make dispatch depend on priority.
    let mut warnings = Vec::new();
    let active: Vec<_> = catalog.dispatch_order().collect();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.format == b.format
                && a.establishment_number.as_str() == b.establishment_number.as_str()
            {
                warnings.push(format!(
                    "'{}' and '{}' share an establishment pattern; '{}' wins ties",
                    a.id, b.id, a.id
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
