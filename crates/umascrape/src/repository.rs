/// Character lookup table: name → archive id, loaded from a JSON file once
/// at startup. A missing or malformed file degrades to an empty repository;
/// unresolved names fall back to the site naming convention.
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CharacterFile {
    #[serde(default)]
    characters: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    pub archive_id: String,
}

impl Character {
    pub fn page_url(&self, base_url: &str) -> String {
        format!("{base_url}/{}", self.archive_id)
    }
}

#[derive(Debug, Default)]
pub struct CharacterRepository {
    characters: Vec<Character>,
}

impl CharacterRepository {
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "character data file unavailable, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<CharacterFile>(&raw) {
            Ok(file) => {
                let repo = Self::from_characters(
                    file.characters
                        .into_iter()
                        .map(|(name, archive_id)| Character { name, archive_id })
                        .collect(),
                );
                info!(
                    count = repo.count(),
                    path = %path.display(),
                    "character repository loaded"
                );
                repo
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse character data, starting empty");
                Self::default()
            }
        }
    }

    pub fn from_characters(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    /// Exact name match first (case-insensitive), then bidirectional
    /// substring match.
    pub fn find(&self, query: &str) -> Option<&Character> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        if let Some(hit) = self
            .characters
            .iter()
            .find(|c| c.name.to_lowercase() == q)
        {
            return Some(hit);
        }

        self.characters.iter().find(|c| {
            let name = c.name.to_lowercase();
            name.contains(&q) || q.contains(&name)
        })
    }

    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    pub fn count(&self) -> usize {
        self.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> CharacterRepository {
        CharacterRepository::from_characters(vec![
            Character {
                name: "Agnes Tachyon".to_string(),
                archive_id: "334848".to_string(),
            },
            Character {
                name: "Special Week".to_string(),
                archive_id: "536317".to_string(),
            },
        ])
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let repo = repo();
        let hit = repo.find("agnes tachyon").expect("found");
        assert_eq!(hit.archive_id, "334848");
    }

    #[test]
    fn substring_match_works_both_directions() {
        let repo = repo();
        assert_eq!(repo.find("tachyon").unwrap().name, "Agnes Tachyon");
        assert_eq!(
            repo.find("special week build guide").unwrap().name,
            "Special Week"
        );
    }

    #[test]
    fn unknown_or_empty_queries_miss() {
        let repo = repo();
        assert!(repo.find("Gold Ship").is_none());
        assert!(repo.find("   ").is_none());
    }

    #[test]
    fn missing_file_loads_empty() {
        let repo = CharacterRepository::load(Path::new("/nonexistent/characters.json"));
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn page_url_joins_base_and_archive_id() {
        let c = Character {
            name: "Agnes Tachyon".to_string(),
            archive_id: "334848".to_string(),
        };
        assert_eq!(
            c.page_url("https://example.test/archives"),
            "https://example.test/archives/334848"
        );
    }
}
