use crate::domain::{Business, GeoPoint, Locatable};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// Filters applied to the business directory. `None` fields mean "all".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryQuery {
    pub term: Option<String>,
    pub category: Option<String>,
    pub neighborhood: Option<String>,
    pub user_location: Option<GeoPoint>,
    pub max_distance_km: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryEntry {
    pub business: Business,
    /// Only known when the user shared a location and the business has coordinates. Entries without one are
    /// dropped as soon as a maximum distance applies.
    pub distance_km: Option<f64>,
}

pub fn apply(query: &DirectoryQuery, businesses: impl IntoIterator<Item = Business>) -> Vec<DirectoryEntry> {
    let term = query.term.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

    let mut entries = businesses
        .into_iter()
        .map(|business| DirectoryEntry {
            distance_km: query
                .user_location
                .zip(business.location())
                .map(|(user, location)| user.distance_km(&location)),
            business,
        })
        .filter(|entry| term.as_deref().is_none_or(|term| matches_term(&entry.business, term)))
        .filter(|entry| query.category.is_none() || entry.business.category_name == query.category)
        .filter(|entry| query.neighborhood.is_none() || entry.business.neighborhood == query.neighborhood)
        .filter(|entry| match (query.user_location, query.max_distance_km) {
            (Some(_), Some(max)) => entry.distance_km.is_some_and(|distance| distance <= max),
            _ => true,
        })
        .collect::<Vec<_>>();

    if query.user_location.is_some() {
        entries.sort_by_key(|entry| OrderedFloat(entry.distance_km.unwrap_or(f64::INFINITY)));
    } else {
        entries.sort_by(|a, b| compare_names(&a.business.name, &b.business.name));
    }
    entries
}

fn matches_term(business: &Business, term: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(term);

    contains(&business.name)
        || business.description.as_deref().is_some_and(contains)
        || business.category_name.as_deref().is_some_and(contains)
        || business.subcategories.iter().any(|sub| contains(sub.as_str()))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
