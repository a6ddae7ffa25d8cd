use aqui_guaira::app_config::AppConfig;
use aqui_guaira::backend::{self, BackendClient, load_or_empty};
use aqui_guaira::directory::{self, DirectoryQuery, GUAIRA_NEIGHBORHOODS};
use aqui_guaira::domain::{Business, GeoPoint, Locatable, TouristSpot};
use aqui_guaira::geolocation::{CenterResolver, CenterState, FixedPositionProvider};
use aqui_guaira::history::{BusinessFavorites, LocationHistory, Place};
use aqui_guaira::postal::PostalClient;
use aqui_guaira::proximity::{self, MAX_RADIUS_M, SearchRadius};
use aqui_guaira::search;
use aqui_guaira::store::{Event, Store, forward_center};
use aqui_guaira::store_listener::store_listener;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "aqui-guaira")]
#[command(about = "Proximity search over the Aqui Guaíra business directory")]
struct Cli {
    /// Search radius in meters, between 100 and 30000
    #[arg(long)]
    radius: Option<u32>,
    /// Center picked on the map as `latitude,longitude`, instead of the device position
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    center: Option<GeoPoint>,
    /// Stars the business with this slug
    #[arg(long)]
    favorite: Option<String>,
    /// Directory search terms as they were typed; only the last one settles
    terms: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    let cli = Cli::parse();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let http_client = backend::new_client(&config)?;
    let backend = BackendClient::new(http_client, &config);
    let postal = PostalClient::new(reqwest::Client::new(), &config);

    let radius = search_radius(cli.radius, config.search().default_radius_m());
    let (tx, rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
    let mut store = Store::new(rx, radius);
    let notifier_rx = store.notifier();

    task::spawn(async move {
        store_listener(notifier_rx).await;
    });
    task::spawn(async move {
        store.listen().await;
    });
    info!("✅  Initialized search store");

    let geolocation = config.geolocation();
    let resolver = CenterResolver::new(geolocation.fallback_center(), geolocation.timeout());
    task::spawn(forward_center(resolver.subscribe(), tx.clone()));

    let (businesses, categories, spots) = futures::join!(
        load_or_empty("businesses", backend.approved_businesses()),
        load_or_empty("categories", backend.categories()),
        load_or_empty("tourist spots", backend.tourist_spots())
    );
    info!(
        "✅  Loaded {} business(es) in {} categories across {} neighborhoods, {} tourist spot(s)",
        businesses.len(),
        categories.len(),
        directory::neighborhoods(&businesses, GUAIRA_NEIGHBORHOODS).len(),
        spots.len()
    );
    tx.send(Event::BusinessesLoaded(businesses.clone())).await?;

    let center_state = match cli.center {
        Some(point) => {
            resolver.set_manual(point);
            resolver.state()
        }
        None => resolver.resolve(&FixedPositionProvider::from_config(geolocation)).await,
    };
    if let CenterState::Failed { .. } = center_state {
        describe_city(&postal, config.postal().city_cep()).await;
    }

    let user_location = center_state.center();
    let nearest_first = directory::apply(
        &DirectoryQuery {
            user_location,
            max_distance_km: Some(f64::from(radius.meters()) / 1000.0),
            ..DirectoryQuery::default()
        },
        businesses.clone(),
    );
    let first_page = directory::paginate(&nearest_first, 1, config.search().page_size());
    info!("📒 Directory page {}/{}, {} business(es) nearby", first_page.number, first_page.total_pages, first_page.total_items);

    if first_page.total_items == 0 {
        info!("🔎 Nothing within {}, widening the search", radius);
        tx.send(Event::RadiusChanged(SearchRadius::clamped(MAX_RADIUS_M))).await?;
    }

    if let Some(center) = user_location {
        list_tourist_spots(center, spots, radius);
    }

    let mut history = LocationHistory::load_or_empty(config.history().path()).await;
    let mut favorites = BusinessFavorites::load_or_empty(config.history().favorites_path()).await;

    if !cli.terms.is_empty() {
        search_directory(cli.terms, businesses.clone(), user_location, &history, &config).await;
    }

    if let Some(nearest) = first_page.items.first() {
        open_business(&backend, &nearest.business).await;

        if let Some(point) = nearest.business.location() {
            let place = Place {
                name: nearest.business.name.clone(),
                address: nearest.business.address.clone().unwrap_or_default(),
                point,
                category: nearest.business.category_name.clone(),
            };
            if let Err(e) = history.add_recent(place, None).await {
                warn!("⚠️ Unable to record the visit: {}", e);
            }
        }
    }

    if let Some(slug) = cli.favorite {
        star_business(&backend, &mut favorites, &slug).await;
    }

    let favorite_ids = favorites.all().iter().map(|f| f.id.clone()).collect::<Vec<_>>();
    let refreshed = load_or_empty("favorite businesses", backend.businesses_by_ids(&favorite_ids)).await;
    info!(
        "⭐ {} favorite business(es) in {} categories, {} still listed; {} recent destination(s)",
        favorites.all().len(),
        favorites.by_category().len(),
        refreshed.len(),
        history.recent().len()
    );

    info!("🔥 {} is done", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn parse_point(value: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = value.split_once(',').ok_or("expected `latitude,longitude`")?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("invalid latitude: {}", e))?;
    let lng = lng.trim().parse::<f64>().map_err(|e| format!("invalid longitude: {}", e))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("{},{} is not a valid coordinate", lat, lng));
    }
    Ok(GeoPoint::new(lat, lng))
}

/// The requested radius, or the configured default. Out of range requests are clamped like the slider does.
fn search_radius(requested: Option<u32>, default_m: u32) -> SearchRadius {
    let Some(meters) = requested else {
        return SearchRadius::clamped(default_m);
    };

    SearchRadius::new(meters).unwrap_or_else(|e| {
        let clamped = SearchRadius::clamped(meters);
        warn!("⚠️ {}, using {}", e, clamped);
        clamped
    })
}

fn list_tourist_spots(center: GeoPoint, spots: Vec<TouristSpot>, radius: SearchRadius) {
    let nearby = proximity::within_radius(Some(center), spots.iter().cloned(), radius);
    for spot in &nearby {
        info!("🏞️ {:>6.2} km  {}", spot.distance_km, spot.entity.name);
    }

    if nearby.is_empty() {
        match proximity::sort_by_distance(&center, spots).first() {
            Some(closest) => info!(
                "🏞️ No tourist spot within {}, closest is '{}' at {:.1} km",
                radius, closest.entity.name, closest.distance_km
            ),
            None => info!("🏞️ No tourist spot on the map"),
        }
    }
}

/// Opens a business' detail page, counting the view.
async fn open_business(backend: &BackendClient, business: &Business) {
    let details = match &business.slug {
        Some(slug) => backend.business_by_slug(slug).await.unwrap_or_else(|e| {
            warn!(business_id = business.id, "⚠️ Unable to load details: {}", e);
            None
        }),
        None => None,
    };
    let business = details.as_ref().unwrap_or(business);
    info!(business_id = business.id, views = business.views, "📒 Opened '{}'", business.name);

    if let Err(e) = backend.increment_views(&business.id).await {
        warn!(business_id = business.id, "⚠️ Unable to count the view: {}", e);
    }
}

async fn star_business(backend: &BackendClient, favorites: &mut BusinessFavorites, slug: &str) {
    match backend.business_by_slug(slug).await {
        Ok(Some(business)) => match favorites.add(&business).await {
            Ok(()) => info!(business_id = business.id, "⭐ Starred '{}'", business.name),
            Err(e) => warn!(business_id = business.id, "⚠️ Unable to star '{}': {}", business.name, e),
        },
        Ok(None) => warn!("⚠️ No business with slug '{}'", slug),
        Err(e) => warn!("⚠️ Unable to load business '{}': {}", slug, e),
    }
}

async fn describe_city(postal: &PostalClient, cep: &str) {
    match postal.lookup(cep).await {
        Ok(address) => {
            let neighborhood = directory::known_neighborhood(&address.neighborhood, GUAIRA_NEIGHBORHOODS).unwrap_or("-");
            info!("📍 Showing businesses around {}/{} ({})", address.city, address.state, neighborhood);
        }
        Err(e) => warn!("⚠️ Unable to describe the city: {}", e),
    }
}

/// Treats each argument as what the user had typed so far; only the settled term is searched.
async fn search_directory(
    terms: Vec<String>,
    businesses: Vec<Business>,
    user_location: Option<GeoPoint>,
    history: &LocationHistory,
    config: &AppConfig,
) {
    let (terms_tx, terms_rx) = mpsc::channel(terms.len());
    let (results_tx, mut results_rx) = mpsc::channel(1);
    let businesses = Arc::new(businesses);

    let searcher = task::spawn(search::debounced_search(terms_rx, results_tx, config.search().debounce(), move |term: String| {
        let businesses = businesses.clone();
        async move {
            let query = DirectoryQuery {
                term: Some(term),
                user_location,
                ..DirectoryQuery::default()
            };
            directory::apply(&query, businesses.iter().cloned())
        }
    }));

    for term in terms {
        if terms_tx.send(term).await.is_err() {
            break;
        }
    }
    drop(terms_tx);

    while let Some((term, entries)) = results_rx.recv().await {
        info!("🔎 '{}': {} result(s)", term, entries.len());
        for entry in entries.iter().take(config.search().page_size()) {
            match entry.distance_km {
                Some(distance) => info!(business_id = entry.business.id, "  {:>6.2} km  {}", distance, entry.business.name),
                None => info!(business_id = entry.business.id, "     -      {}", entry.business.name),
            }
        }
        for place in history.search(&term) {
            info!("  💾 {} ({})", place.place.name, place.place.address);
        }
    }

    if let Err(e) = searcher.await {
        warn!("⚠️ Directory search stopped unexpectedly: {}", e);
    }
}
