use std::path::PathBuf;
use std::time::Duration;

use crate::clients::{
    catalog::{AlbumsQuery, TopTracksQuery},
    errors::{Error, Result},
    local_storage::LocalStorage,
};

/// Largest page the top-tracks endpoint accepts
pub const MAX_LIMIT: usize = 50;

/// Pipeline settings. Client credentials are read separately by
/// [`crate::clients::SpotifyClient::try_default`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: String,
    pub artist_id: String,
    pub country: String,
    pub limit: usize,
    pub album_type: String,
    pub max_pages: usize,
    pub db_path: PathBuf,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base: "https://api.spotify.com/v1".into(),
            artist_id: "06HL4z0CvFAxyc27GXpf02".into(),
            country: "US".into(),
            limit: MAX_LIMIT,
            album_type: "album".into(),
            max_pages: 100,
            db_path: LocalStorage::default_path(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.artist_id.trim().is_empty() {
            return Err(Error::ConfigurationError("artist id must not be empty".into()));
        }
        if self.country.trim().is_empty() {
            return Err(Error::ConfigurationError("country must not be empty".into()));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(Error::ConfigurationError(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if self.max_pages == 0 {
            return Err(Error::ConfigurationError("max pages must be at least 1".into()));
        }
        Ok(())
    }

    pub fn top_tracks_query(&self) -> TopTracksQuery {
        TopTracksQuery {
            artist_id: self.artist_id.clone(),
            country: self.country.clone(),
            limit: self.limit,
        }
    }

    pub fn albums_query(&self) -> AlbumsQuery {
        AlbumsQuery {
            artist_id: self.artist_id.clone(),
            album_type: self.album_type.clone(),
            max_pages: self.max_pages,
        }
    }
}
