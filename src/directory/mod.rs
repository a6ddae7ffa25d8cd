mod filter;
mod neighborhoods;
mod pagination;

pub use filter::{DirectoryEntry, DirectoryQuery, apply};
pub use neighborhoods::{GUAIRA_NEIGHBORHOODS, known_neighborhood, neighborhoods};
pub use pagination::{Page, paginate};
