use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::info;
use rcatalog::clients::{LocalStorage, errors::Result};
use rcatalog::pipeline::{ConfigBuilder, Pipeline};
use rcatalog::settings::Settings;

#[derive(Parser)]
#[command(name = "rcatalog")]
#[command(version, about = "Pull Spotify catalog metadata into a local database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Unset options fall back to `Settings::default()`
#[derive(Subcommand)]
enum Commands {
    /// Fetch an artist's top tracks and append them to the database
    TopTracks {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, env = "RCATALOG_COUNTRY")]
        country: Option<String>,
        #[arg(long, env = "RCATALOG_LIMIT")]
        limit: Option<usize>,
        #[arg(long, env = "RCATALOG_DB_PATH")]
        db_path: Option<PathBuf>,
    },
    /// Page through an artist's albums and log their names
    Albums {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, env = "RCATALOG_ALBUM_TYPE")]
        album_type: Option<String>,
        #[arg(long, env = "RCATALOG_MAX_PAGES")]
        max_pages: Option<usize>,
    },
    /// Print the rows stored so far
    Show {
        #[arg(long, env = "RCATALOG_DB_PATH")]
        db_path: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CommonArgs {
    #[arg(long, env = "RCATALOG_ARTIST_ID")]
    artist_id: Option<String>,
    #[arg(long, env = "RCATALOG_API_BASE")]
    api_base: Option<String>,
    #[arg(long, env = "RCATALOG_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,
}

impl CommonArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(artist_id) = self.artist_id {
            settings.artist_id = artist_id;
        }
        if let Some(api_base) = self.api_base {
            settings.api_base = api_base;
        }
        if let Some(secs) = self.http_timeout_secs {
            settings.http_timeout = Duration::from_secs(secs);
        }
    }
}

impl Commands {
    fn settings(self) -> Settings {
        let mut settings = Settings::default();
        match self {
            Commands::TopTracks {
                common,
                country,
                limit,
                db_path,
            } => {
                common.apply(&mut settings);
                if let Some(country) = country {
                    settings.country = country;
                }
                if let Some(limit) = limit {
                    settings.limit = limit;
                }
                if let Some(path) = db_path {
                    settings.db_path = path;
                }
            }
            Commands::Albums {
                common,
                album_type,
                max_pages,
            } => {
                common.apply(&mut settings);
                if let Some(album_type) = album_type {
                    settings.album_type = album_type;
                }
                if let Some(max_pages) = max_pages {
                    settings.max_pages = max_pages;
                }
            }
            Commands::Show { db_path } => {
                if let Some(path) = db_path {
                    settings.db_path = path;
                }
            }
        }
        settings
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        command @ Commands::TopTracks { .. } => top_tracks(command.settings()).await,
        command @ Commands::Albums { .. } => albums(command.settings()).await,
        command @ Commands::Show { .. } => show(LocalStorage::new(command.settings().db_path)).await,
    }
}

async fn top_tracks(settings: Settings) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new().settings(settings).build()?;
    config.storage.init_db().await?;
    let pipeline = Pipeline::new(config);
    pipeline.run_top_tracks().await?;
    Ok(())
}

async fn albums(settings: Settings) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new().settings(settings).build()?;
    let pipeline = Pipeline::new(config);
    pipeline.run_albums().await?;
    Ok(())
}

async fn show(storage: LocalStorage) -> Result<()> {
    for track in storage.top_tracks().await? {
        println!(
            "{}\t{}\t{}",
            track.name, track.artist_name, track.album_name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        Cli::try_parse_from(args).unwrap().command.settings()
    }

    #[test]
    fn unset_options_keep_settings_defaults() {
        let defaults = Settings::default();
        let settings = parse(&["rcatalog", "top-tracks"]);
        assert_eq!(settings.artist_id, defaults.artist_id);
        assert_eq!(settings.api_base, defaults.api_base);
        assert_eq!(settings.country, defaults.country);
        assert_eq!(settings.limit, defaults.limit);
        assert_eq!(settings.http_timeout, defaults.http_timeout);

        let settings = parse(&["rcatalog", "albums"]);
        assert_eq!(settings.album_type, defaults.album_type);
        assert_eq!(settings.max_pages, defaults.max_pages);
    }

    #[test]
    fn options_override_defaults() {
        let settings = parse(&[
            "rcatalog",
            "top-tracks",
            "--artist-id",
            "abc",
            "--country",
            "SE",
            "--limit",
            "10",
            "--db-path",
            "/tmp/tracks.duckdb",
            "--http-timeout-secs",
            "5",
        ]);
        assert_eq!(settings.artist_id, "abc");
        assert_eq!(settings.country, "SE");
        assert_eq!(settings.limit, 10);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/tracks.duckdb"));
        assert_eq!(settings.http_timeout, Duration::from_secs(5));

        let settings = parse(&["rcatalog", "albums", "--album-type", "single", "--max-pages", "3"]);
        assert_eq!(settings.album_type, "single");
        assert_eq!(settings.max_pages, 3);
    }
}
