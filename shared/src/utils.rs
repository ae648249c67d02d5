use std::collections::HashSet;

/// Drop repeated strings, keeping the first occurrence of each.
pub fn unique_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
