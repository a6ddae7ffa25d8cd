use crate::domain::Business;
use std::collections::BTreeSet;

pub const GUAIRA_NEIGHBORHOODS: &[&str] = &["Centro", "Jardim América", "Jardim Europa"];

/// The known neighborhoods merged with those used by businesses, sorted and without duplicates.
pub fn neighborhoods(businesses: &[Business], known: &[&str]) -> Vec<String> {
    known
        .iter()
        .map(|n| n.to_string())
        .chain(businesses.iter().filter_map(|b| b.neighborhood.clone()))
        .filter(|n| !n.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Returns the neighborhood only when it is one of the known ones. Used to pre-fill forms from a postal lookup.
pub fn known_neighborhood<'a>(candidate: &str, known: &[&'a str]) -> Option<&'a str> {
    known.iter().copied().find(|n| n.eq_ignore_ascii_case(candidate.trim()))
}
