use std::collections::HashSet;

/// Keeps the first occurrence of every value, in input order.
pub fn unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut list = Vec::new();

    for entry in items {
        let entry = entry.into();
        if seen.insert(entry.clone()) {
            list.push(entry);
        }
    }

    list
}
