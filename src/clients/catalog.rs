use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::clients::{
    entities::{Album, AlbumRecord, BearerToken, ResultPage, TopTracksBody, TrackRecord},
    errors::Result,
};

/// Status and body of one catalog request
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    pub status: u16,
    pub body: String,
}

impl CatalogResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues authenticated GET requests against the catalog API
pub trait CatalogTransport: Send + Sync {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &BearerToken,
    ) -> impl Future<Output = Result<CatalogResponse>> + Send;
}

pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport { http })
    }
}

impl CatalogTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &BearerToken,
    ) -> Result<CatalogResponse> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(CatalogResponse { status, body })
    }
}

/// Top tracks for one artist in one market
#[derive(Debug, Clone)]
pub struct TopTracksQuery {
    pub artist_id: String,
    pub country: String,
    pub limit: usize,
}

/// Album listing for one artist
#[derive(Debug, Clone)]
pub struct AlbumsQuery {
    pub artist_id: String,
    pub album_type: String,
    pub max_pages: usize,
}

pub struct CatalogFetcher<T> {
    transport: T,
    api_base: String,
}

impl<T: CatalogTransport> CatalogFetcher<T> {
    pub fn new(transport: T, api_base: impl Into<String>) -> Self {
        CatalogFetcher {
            transport,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    // Returns None when the API answers with a non-success status
    pub async fn top_tracks(
        &self,
        token: &BearerToken,
        query: &TopTracksQuery,
    ) -> Result<Option<ResultPage<TrackRecord>>> {
        let url = format!("{}/artists/{}/top-tracks", self.api_base, query.artist_id);
        let params = [
            ("country", query.country.clone()),
            ("limit", query.limit.to_string()),
        ];

        let Some(body) = self.fetch::<TopTracksBody>(&url, &params, token).await? else {
            return Ok(None);
        };
        let mut page = ResultPage::from(body);
        page.items.truncate(query.limit);
        debug!("Fetched {} top tracks for artist {}", page.items.len(), query.artist_id);
        Ok(Some(page))
    }

    // Follows `next` cursors until the last page or until `max_pages` requests were made
    pub async fn artist_albums(
        &self,
        token: &BearerToken,
        query: &AlbumsQuery,
    ) -> Result<Vec<Album>> {
        let first_url = format!("{}/artists/{}/albums", self.api_base, query.artist_id);
        let first_params = [("album_type", query.album_type.clone())];

        let Some(mut page) = self
            .fetch::<ResultPage<AlbumRecord>>(&first_url, &first_params, token)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut albums = Vec::new();
        let mut pages = 1;
        loop {
            albums.extend(page.items.into_iter().map(Album::from));
            let Some(cursor) = page.next_cursor else {
                break;
            };
            if pages >= query.max_pages {
                warn!(
                    "Stopping album listing after {pages} pages, more pages are available at {cursor}"
                );
                break;
            }
            // The token is only ever sent to the configured API
            if !self.is_api_url(&cursor) {
                warn!("Ignoring next page outside of {}: {cursor}", self.api_base);
                break;
            }
            match self.fetch::<ResultPage<AlbumRecord>>(&cursor, &[], token).await? {
                Some(next) => {
                    page = next;
                    pages += 1;
                }
                None => break,
            }
        }

        debug!(
            "Fetched {} albums in {pages} pages for artist {}",
            albums.len(),
            query.artist_id
        );
        Ok(albums)
    }

    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(self.api_base.as_str())
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
    }

    async fn fetch<B: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        token: &BearerToken,
    ) -> Result<Option<B>> {
        debug!("GET {url}");
        let response = self.transport.get(url, params, token).await?;
        if !response.is_success() {
            warn!("Error: {} - {}", response.status, response.body);
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&response.body)?))
    }
}
