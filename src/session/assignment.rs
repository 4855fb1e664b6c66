//! Normalization between the two external forms of an assignment collection
//! (array or comma-joined string) and the canonical in-memory list.

use serde::{Deserialize, Deserializer, Serialize};

/// Split a delimiter-joined collection into its canonical form: split on
/// comma, trim, drop empties.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

/// Re-join a canonical list for display and editing.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Accepts an array, a comma-joined string, or null; always yields the
/// canonical list form.
pub fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Items(Vec<String>),
        Joined(String),
    }
    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Items(items)) => Ok(items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(|item| item.to_string())
            .collect()),
        Some(Raw::Joined(text)) => Ok(split_list(&text)),
        None => Ok(Vec::new()),
    }
}

/// Wire payload for PUT /api/auth/profile. Collections are always submitted
/// in array form; empty scalar fields are submitted as null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentUpdate {
    pub sector: Option<String>,
    pub service: Option<String>,
    pub poles: Vec<String>,
    pub habilitations: Vec<String>,
    pub fjf: bool,
}
