//! Directory operations served by the HTTP API: listing, name transformation,
//! size filtering and recursive file search.
pub mod filter;
pub mod listing;
pub mod search;
pub mod transform;
