use packlist_core::error::PacklistError;
use packlist_core::rules::{self, RuleCatalog};
use std::path::Path;

pub fn list() -> Result<(), PacklistError> {
    let rules = RuleCatalog::builtin()?;
    print_rules(&rules);
    Ok(())
}

fn print_rules(rules: &RuleCatalog) {
    println!("{} (v{})\n", rules.name, rules.version);
    println!("  {:<8} {:<12} Treatment", "Country", "Commodity");
    println!("  {}", "-".repeat(40));
    for rule in &rules.rules {
        let treatment = match (rule.exception(), rule.type_of_treatment.as_deref()) {
            (Some(allowed), _) => format!("any except {allowed}"),
            (None, Some(t)) => t.to_string(),
            (None, None) => "any".to_string(),
        };
        println!(
            "  {:<8} {:<12} {}",
            rule.country_of_origin, rule.commodity_code, treatment
        );
    }
}

pub fn validate(file: &Path) -> Result<(), PacklistError> {
    let rules = rules::load_rules(file)?;

    println!("Rule file '{}' (v{}) is valid.", rules.name, rules.version);
    println!("  Rules: {}", rules.rules.len());

    let exceptions = rules.rules.iter().filter(|r| r.is_exception()).count();
    if exceptions > 0 {
        println!(
            "  {exceptions} exception rule(s); these replace every standard rule for the same country and commodity"
        );
    }

    Ok(())
}
