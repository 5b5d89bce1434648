use std::fmt;

use serde::Deserialize;

/// Short-lived access token obtained from the client-credentials flow
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        BearerToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the token itself
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ArtistRecord {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AlbumRef {
    pub name: String,
}

/// Raw track item as returned by the catalog API
#[derive(Deserialize, Debug, Clone)]
pub struct TrackRecord {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
    pub album: AlbumRef,
}

/// Raw album item as returned by the album listing
#[derive(Deserialize, Debug, Clone)]
pub struct AlbumRecord {
    pub name: String,
}

/// One page of catalog results. `next_cursor` is absent on the last page.
#[derive(Deserialize, Debug, Clone)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    #[serde(rename = "next")]
    pub next_cursor: Option<String>,
}

impl<T> ResultPage<T> {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

// Top tracks body: `{ "tracks": [...] }`, never paginated
#[derive(Deserialize, Debug)]
pub(crate) struct TopTracksBody {
    pub tracks: Vec<TrackRecord>,
}

impl From<TopTracksBody> for ResultPage<TrackRecord> {
    fn from(body: TopTracksBody) -> Self {
        ResultPage {
            items: body.tracks,
            next_cursor: None,
        }
    }
}

/// Row stored in the `top_tracks` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub artist_name: String, // primary artist only
    pub album_name: String,
}

impl From<&TrackRecord> for Track {
    fn from(record: &TrackRecord) -> Track {
        Track {
            name: record.name.clone(),
            artist_name: record
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            album_name: record.album.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
}

impl From<AlbumRecord> for Album {
    fn from(record: AlbumRecord) -> Album {
        Album { name: record.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_primary_artist_and_album() {
        let body: TopTracksBody = serde_json::from_str(
            r#"{"tracks": [{"name": "A", "artists": [{"name": "X"}, {"name": "Y"}], "album": {"name": "M"}, "popularity": 90}]}"#,
        )
        .unwrap();
        let page = ResultPage::from(body);
        assert!(page.is_last());

        let track = Track::from(&page.items[0]);
        assert_eq!(
            track,
            Track {
                name: "A".into(),
                artist_name: "X".into(),
                album_name: "M".into(),
            }
        );
    }

    #[test]
    fn missing_artists_project_to_empty_name() {
        let record: TrackRecord =
            serde_json::from_str(r#"{"name": "A", "album": {"name": "M"}}"#).unwrap();
        assert_eq!(Track::from(&record).artist_name, "");
    }

    #[test]
    fn album_page_reads_next_cursor() {
        let page: ResultPage<AlbumRecord> = serde_json::from_str(
            r#"{"items": [{"name": "One"}], "next": "https://api.example/next", "total": 2}"#,
        )
        .unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("https://api.example/next"));
        assert!(!page.is_last());

        let last: ResultPage<AlbumRecord> =
            serde_json::from_str(r#"{"items": [], "next": null}"#).unwrap();
        assert!(last.is_last());
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = BearerToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
        assert_eq!(token.as_str(), "secret-value");
    }
}
