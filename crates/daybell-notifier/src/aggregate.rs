//! Cross-source merge of birthday names.

use std::collections::HashSet;

/// Calendar names first, then contact names; the first occurrence of each
/// exact string wins.
pub fn merge_birthday_names(calendar_names: Vec<String>, contact_names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(calendar_names.len() + contact_names.len());
    calendar_names
        .into_iter()
        .chain(contact_names)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
