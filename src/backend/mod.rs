mod client;
mod repository;

pub use client::{BackendError, new_client};
pub use repository::{BackendClient, load_or_empty};
