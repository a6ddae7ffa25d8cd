use crate::domain::{GeoPoint, Locatable, Nearby};
use crate::proximity::SearchRadius;
use ordered_float::OrderedFloat;

/// Entities within `radius` of `center`, nearest first.
///
/// Without a center there is nothing to measure against and the result is empty. Entities lacking a
/// location are skipped, as are entities whose distance is `NaN`.
pub fn within_radius<T, I>(center: Option<GeoPoint>, entities: I, radius: SearchRadius) -> Vec<Nearby<T>>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let Some(center) = center else {
        return Vec::new();
    };

    let mut nearby = annotate(&center, entities)
        .filter(|n| radius.contains_km(n.distance_km))
        .collect::<Vec<_>>();
    nearby.sort_by_key(|n| OrderedFloat(n.distance_km));
    nearby
}

/// All locatable entities annotated with their distance to `center`, nearest first.
pub fn sort_by_distance<T, I>(center: &GeoPoint, entities: I) -> Vec<Nearby<T>>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let mut nearby = annotate(center, entities).collect::<Vec<_>>();
    nearby.sort_by_key(|n| OrderedFloat(n.distance_km));
    nearby
}

fn annotate<T, I>(center: &GeoPoint, entities: I) -> impl Iterator<Item = Nearby<T>>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    entities.into_iter().filter_map(move |entity| {
        let location = entity.location()?;
        Some(Nearby {
            distance_km: center.distance_km(&location),
            entity,
        })
    })
}
