use std::future::Future;

use log::debug;
use rspotify::{ClientCredsSpotify, Credentials};

use crate::clients::{
    entities::BearerToken,
    errors::{Error, Result},
};

/// Source of bearer tokens for the catalog API
pub trait CredentialProvider: Send + Sync {
    /// Exchange the configured client credentials for a fresh token
    fn bearer_token(&self) -> impl Future<Output = Result<BearerToken>> + Send;
}

pub struct SpotifyClient {
    pub spotify: ClientCredsSpotify,
}

impl SpotifyClient {
    pub fn new(creds: Credentials) -> Self {
        SpotifyClient {
            spotify: ClientCredsSpotify::new(creds),
        }
    }

    // Create a SpotifyClient from RSPOTIFY_CLIENT_ID / RSPOTIFY_CLIENT_SECRET or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env().ok_or_else(|| {
            Error::ConfigurationError(
                "Missing Spotify credentials, set RSPOTIFY_CLIENT_ID and RSPOTIFY_CLIENT_SECRET"
                    .into(),
            )
        })?;
        Ok(Self::new(creds))
    }
}

impl CredentialProvider for SpotifyClient {
    async fn bearer_token(&self) -> Result<BearerToken> {
        debug!("Requesting client-credentials token ...");
        self.spotify.request_token().await?;

        let guard = self
            .spotify
            .token
            .lock()
            .await
            .map_err(|_| Error::AuthError("token store is unavailable".into()))?;
        let token = guard
            .as_ref()
            .ok_or_else(|| Error::AuthError("no token returned by the token endpoint".into()))?;
        debug!("Obtained access token");
        Ok(BearerToken::new(token.access_token.clone()))
    }
}
