use packlist_core::error::PacklistError;
use packlist_core::model::ParsedPackingList;

pub fn to_json(list: &ParsedPackingList) -> Result<String, PacklistError> {
    Ok(serde_json::to_string_pretty(list)?)
}

pub fn print(list: &ParsedPackingList) -> Result<(), PacklistError> {
    println!("{}", to_json(list)?);
    Ok(())
}
