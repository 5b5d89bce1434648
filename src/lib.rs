//! Rcatalog - Pull Spotify catalog metadata into a local database
//!
//! A run obtains a client-credentials token, fetches an artist's top tracks
//! (or pages through the artist's albums) and appends the results to the
//! `top_tracks` table.

/// Client modules for the catalog API, credentials and local storage
pub mod clients;
/// Stage sequencing
pub mod pipeline;
/// Run settings
pub mod settings;
