/// Catalog API fetcher and HTTP transport
pub mod catalog;
/// Data entities for tracks, albums and tokens
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Destination table using `DuckDB`
pub mod local_storage;
/// Spotify client-credentials provider
pub mod spotify;

pub use catalog::{CatalogFetcher, CatalogResponse, CatalogTransport, HttpTransport};
pub use local_storage::LocalStorage;
pub use spotify::{CredentialProvider, SpotifyClient};
