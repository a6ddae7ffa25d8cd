mod client;

pub use client::{PostalAddress, PostalClient, PostalLookupError, normalize_cep};
