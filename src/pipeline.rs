use log::{debug, info};

use crate::clients::{
    catalog::{CatalogFetcher, CatalogTransport, HttpTransport},
    entities::Album,
    errors::Result,
    local_storage::LocalStorage,
    spotify::{CredentialProvider, SpotifyClient},
};
use crate::settings::Settings;

// Components the Pipeline is wired from
pub struct Config<C, T> {
    pub credentials: C,
    pub catalog: CatalogFetcher<T>,
    pub storage: LocalStorage,
    pub settings: Settings,
}

impl<C, T> Config<C, T>
where
    C: CredentialProvider,
    T: CatalogTransport,
{
    pub fn new(credentials: C, transport: T, settings: Settings) -> Self {
        Config {
            credentials,
            catalog: CatalogFetcher::new(transport, settings.api_base.clone()),
            storage: LocalStorage::new(settings.db_path.clone()),
            settings,
        }
    }
}

pub struct ConfigBuilder {
    spotify: Option<SpotifyClient>,
    transport: Option<HttpTransport>,
    settings: Option<Settings>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            spotify: None,
            transport: None,
            settings: None,
        }
    }

    #[must_use]
    pub fn spotify(mut self, spotify: SpotifyClient) -> Self {
        self.spotify = Some(spotify);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: HttpTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<Config<SpotifyClient, HttpTransport>> {
        let settings = self.settings.unwrap_or_default();
        settings.validate()?;
        let spotify = match self.spotify {
            Some(s) => s,
            None => SpotifyClient::try_default()?,
        };
        let transport = match self.transport {
            Some(t) => t,
            None => HttpTransport::new(settings.http_timeout)?,
        };
        Ok(Config::new(spotify, transport, settings))
    }
}

/// Outcome of a top-tracks run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Items returned by the catalog, `None` when the fetch failed
    pub fetched: Option<usize>,
    /// Rows inserted into the destination table
    pub written: usize,
}

/// Runs token -> fetch -> write, each stage fed only by the one before it.
pub struct Pipeline<C, T> {
    config: Config<C, T>,
}

impl<C, T> Pipeline<C, T>
where
    C: CredentialProvider,
    T: CatalogTransport,
{
    pub fn new(config: Config<C, T>) -> Self {
        Pipeline { config }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.config.storage
    }

    pub async fn run_top_tracks(&self) -> Result<RunReport> {
        info!("Starting top tracks run ...");
        let token = self.config.credentials.bearer_token().await?;

        let query = self.config.settings.top_tracks_query();
        debug!(
            "Fetching top {} tracks for artist {} in {} ...",
            query.limit, query.artist_id, query.country
        );
        let fetched = self.config.catalog.top_tracks(&token, &query).await?;
        if fetched.is_none() {
            debug!("No top tracks fetched, nothing will be written");
        }

        let written = self
            .config
            .storage
            .write_top_tracks(fetched.as_ref())
            .await?;

        let report = RunReport {
            fetched: fetched.map(|page| page.items.len()),
            written,
        };
        info!(
            "Top tracks run completed. Written rows: {}, storage: {:?}",
            report.written,
            self.config.storage.path()
        );
        Ok(report)
    }

    pub async fn run_albums(&self) -> Result<Vec<Album>> {
        info!("Starting album listing run ...");
        let token = self.config.credentials.bearer_token().await?;

        let query = self.config.settings.albums_query();
        let albums = self.config.catalog.artist_albums(&token, &query).await?;

        for album in &albums {
            info!("{}", album.name);
        }
        info!("Album listing completed. Albums: {}", albums.len());
        Ok(albums)
    }
}
