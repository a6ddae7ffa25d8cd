pub mod app_config;
pub mod backend;
pub mod directory;
pub mod domain;
mod geo_point_deserializer;
pub mod geolocation;
pub mod history;
pub mod postal;
pub mod proximity;
pub mod search;
pub mod store;
pub mod store_listener;
