mod debounce;

pub use debounce::{debounce, debounced_search};
