/// Request orchestration: resolve the identifier, fetch the page, parse it,
/// match races, assemble the result. One strictly sequential pass per
/// request; the only shared state is the immutable catalog and repository.
use std::sync::Arc;

use tracing::{debug, info};

use uma_common::http::PageClient;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{CharacterResult, RaceDescriptor};
use crate::repository::CharacterRepository;
use crate::{assemble, matcher, parser};

pub struct CharacterService {
    client: PageClient,
    repo: CharacterRepository,
    catalog: Arc<Vec<RaceDescriptor>>,
    config: Config,
}

impl CharacterService {
    pub fn new(
        client: PageClient,
        repo: CharacterRepository,
        catalog: Arc<Vec<RaceDescriptor>>,
        config: Config,
    ) -> Self {
        Self {
            client,
            repo,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &CharacterRepository {
        &self.repo
    }

    pub fn catalog(&self) -> &[RaceDescriptor] {
        &self.catalog
    }

    /// Run the full pipeline for one identifier. Fetch and parse failures
    /// propagate as terminal errors; missing page fields are absorbed as
    /// absent values in the result.
    pub async fn get_character_data(
        &self,
        query: Option<&str>,
    ) -> Result<CharacterResult, AppError> {
        let url = self.resolve_url(query);
        info!(url = %url, query = query.unwrap_or("(default)"), "fetching character page");

        let body = self.client.get_text(&url).await?;
        let page = parser::parse_character_page(&body)?;
        let matches = matcher::find_matching_races(&page.events, &self.catalog);
        let result = assemble::assemble(url, page, matches);

        info!(
            events = result.events.len(),
            races = result.matching_races.len(),
            not_found = result.is_not_found(),
            "character page processed"
        );
        Ok(result)
    }

    /// Direct addresses pass through verbatim; names resolve via the
    /// repository, then the site naming convention. An absent query maps to
    /// the configured default character.
    fn resolve_url(&self, query: Option<&str>) -> String {
        let base = &self.config.base_url;

        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return format!("{base}/{}", self.config.default_archive_id);
        };

        if query.starts_with("http://") || query.starts_with("https://") {
            return query.to_string();
        }

        if let Some(character) = self.repo.find(query) {
            debug!(name = %character.name, "resolved via character repository");
            return character.page_url(base);
        }

        format!("{base}/{}", slug_for_name(query))
    }
}

/// Site naming convention for pages addressed by name: alphanumeric runs
/// joined by single dashes.
fn slug_for_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}
