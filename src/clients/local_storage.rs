use async_duckdb::ClientBuilder;
use async_duckdb::duckdb::{Connection, params};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::clients::entities::{ResultPage, Track, TrackRecord};
use crate::clients::errors::{Error, Result};

enum Table {
    TopTracks,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::TopTracks => "top_tracks",
        }
    }
}

/// Destination database for fetched tracks.
///
/// Every operation opens its own connection and closes it before returning,
/// whether the operation succeeded or not.
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStorage { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".rcatalog_db.duckdb")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_table_query() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                track_name TEXT,
                artist_name TEXT,
                album_name TEXT
            );",
            Table::TopTracks.as_str()
        )
    }

    // Create the destination table if missing; existing rows are kept
    pub async fn init_db(&self) -> Result<()> {
        let query = Self::create_table_query();
        self.with_connection(move |conn| conn.execute_batch(&query))
            .await?;
        debug!("Initialized table {}", Table::TopTracks.as_str());
        Ok(())
    }

    /// Insert one row per fetched track, in input order.
    ///
    /// All rows of a call are written in a single transaction: either the
    /// whole batch is committed or nothing is. `None` and empty pages write
    /// zero rows.
    pub async fn write_top_tracks(
        &self,
        fetched: Option<&ResultPage<TrackRecord>>,
    ) -> Result<usize> {
        let rows: Vec<Track> = fetched
            .map(|page| page.items.iter().map(Track::from).collect())
            .unwrap_or_default();
        let create = Self::create_table_query();
        let insert = format!(
            "INSERT INTO {} (track_name, artist_name, album_name) VALUES (?, ?, ?);",
            Table::TopTracks.as_str()
        );

        let written = self
            .with_connection(move |conn| {
                let tx = conn.transaction()?;
                tx.execute_batch(&create)?;
                {
                    let mut stmt = tx.prepare(&insert)?;
                    for track in &rows {
                        stmt.execute(params![track.name, track.artist_name, track.album_name])?;
                    }
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await?;

        debug!("Inserted {written} rows into {}", Table::TopTracks.as_str());
        Ok(written)
    }

    // Read back all stored rows, oldest first
    pub async fn top_tracks(&self) -> Result<Vec<Track>> {
        let create = Self::create_table_query();
        let query = format!(
            "SELECT track_name, artist_name, album_name FROM {} ORDER BY rowid;",
            Table::TopTracks.as_str()
        );

        let tracks = self
            .with_connection(move |conn| {
                conn.execute_batch(&create)?;
                let mut stmt = conn.prepare(&query)?;
                let mut rows = stmt.query([])?;
                let mut tracks = vec![];
                while let Some(row) = rows.next()? {
                    tracks.push(Track {
                        name: row.get(0)?,
                        artist_name: row.get(1)?,
                        album_name: row.get(2)?,
                    });
                }
                Ok(tracks)
            })
            .await?;

        Ok(tracks)
    }

    async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> std::result::Result<T, async_duckdb::duckdb::Error>
            + Send
            + 'static,
        T: Send + 'static,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let client = ClientBuilder::new().path(&self.path).open().await?;
        debug!("Opened database at {:?}", self.path);

        let result = client.conn_mut(f).await.map_err(Error::from);

        // Release the connection on every path, including a failed statement
        if let Err(e) = client.close().await {
            warn!("Failed to close database at {:?}: {e}", self.path);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::{AlbumRef, ArtistRecord};

    fn record(name: &str, artist: &str, album: &str) -> TrackRecord {
        TrackRecord {
            name: name.into(),
            artists: vec![ArtistRecord { name: artist.into() }],
            album: AlbumRef { name: album.into() },
        }
    }

    fn page(records: Vec<TrackRecord>) -> ResultPage<TrackRecord> {
        ResultPage {
            items: records,
            next_cursor: None,
        }
    }

    fn temp_storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("catalog.duckdb"));
        (dir, storage)
    }

    #[tokio::test]
    async fn writes_rows_in_input_order() {
        let (_dir, storage) = temp_storage();
        let fetched = page(vec![
            record("A", "X", "M"),
            record("B", "Y", "N"),
            record("C", "Z", "O"),
        ]);

        let written = storage.write_top_tracks(Some(&fetched)).await.unwrap();
        assert_eq!(written, 3);

        let names: Vec<_> = storage
            .top_tracks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn absent_result_writes_nothing() {
        let (_dir, storage) = temp_storage();
        assert_eq!(storage.write_top_tracks(None).await.unwrap(), 0);
        assert_eq!(storage.write_top_tracks(Some(&page(vec![]))).await.unwrap(), 0);
        assert!(storage.top_tracks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn init_db_is_idempotent() {
        let (_dir, storage) = temp_storage();
        storage.init_db().await.unwrap();
        storage
            .write_top_tracks(Some(&page(vec![record("A", "X", "M")])))
            .await
            .unwrap();
        storage.init_db().await.unwrap();
        assert_eq!(storage.top_tracks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested").join("catalog.duckdb"));
        storage.init_db().await.unwrap();
        assert!(storage.path().exists());
    }
}
