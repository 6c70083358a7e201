use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables.
///
/// Every value has a default matching the public site layout; deployments
/// override via the environment only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL character pages hang off of.
    pub base_url: String,
    /// Page holding the race schedule tables.
    pub race_list_url: String,
    /// Archive id fetched when no query is supplied.
    pub default_archive_id: String,
    /// JSON lookup table mapping character names to archive ids.
    pub character_data_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GAME8_BASE_URL`: base URL for character pages
    /// - `GAME8_RACE_LIST_URL`: race schedule page
    /// - `DEFAULT_ARCHIVE_ID`: archive id for empty queries
    /// - `CHARACTER_DATA_FILE`: path to the character lookup JSON
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("GAME8_BASE_URL")
            .unwrap_or_else(|_| {
                "https://game8.co/games/Umamusume-Pretty-Derby/archives".to_string()
            })
            .trim_end_matches('/')
            .to_string();

        let race_list_url = std::env::var("GAME8_RACE_LIST_URL").unwrap_or_else(|_| {
            "https://game8.co/games/Umamusume-Pretty-Derby/archives/536131".to_string()
        });

        let default_archive_id =
            std::env::var("DEFAULT_ARCHIVE_ID").unwrap_or_else(|_| "536317".to_string());

        let character_data_file = std::env::var("CHARACTER_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/characters.json"));

        for (name, url) in [
            ("GAME8_BASE_URL", &base_url),
            ("GAME8_RACE_LIST_URL", &race_list_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "{name} must be an http(s) URL, got {url}"
                )));
            }
        }

        Ok(Self {
            base_url,
            race_list_url,
            default_archive_id,
            character_data_file,
        })
    }
}
