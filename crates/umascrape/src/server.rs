/// MCP server exposing the scraping pipeline.
///
/// Exposes three tools:
/// - `get_character_data`: run the fetch → parse → match pipeline for one character
/// - `list_characters`: the character lookup table with resolved page URLs
/// - `list_races`: the race catalog loaded at startup
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::model::{CharacterResult, EventRecord, RaceDescriptor, RaceMatch, StatBlock, Tier};
use crate::service::CharacterService;

#[derive(Clone)]
pub struct UmaScrapeServer {
    service: Arc<CharacterService>,
    tool_router: ToolRouter<UmaScrapeServer>,
}

impl UmaScrapeServer {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetCharacterDataParams {
    /// Character name or direct page URL. Omit for the default character.
    query: Option<String>,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct CharacterDataResponse {
    url: String,
    title: String,
    /// False when the page had no recognizable character content.
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    overall_rank: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommended_stats: Option<StatBlock>,
    events: Vec<EventRecord>,
    matching_races: Vec<RaceMatch>,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct CharacterSummary {
    name: String,
    url: String,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct CharacterListResponse {
    count: usize,
    characters: Vec<CharacterSummary>,
}

#[derive(Debug, serde::Serialize, JsonSchema)]
struct RaceCatalogResponse {
    count: usize,
    races: Vec<RaceDescriptor>,
}

#[tool_router]
impl UmaScrapeServer {
    #[tool(description = "Fetch a character's wiki page and return its title, tier rank, recommended stats, training events, and the known races mentioned in those events. Accepts a character name or a direct page URL; omit the query for the default character.")]
    async fn get_character_data(
        &self,
        Parameters(params): Parameters<GetCharacterDataParams>,
    ) -> Result<Json<CharacterDataResponse>, String> {
        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let result = self
            .service
            .get_character_data(query)
            .await
            .map_err(|e| format!("scrape failed: {e}"))?;

        Ok(Json(to_response(result)))
    }

    #[tool(description = "List the characters known to the lookup table, with their resolved page URLs.")]
    async fn list_characters(&self) -> Result<Json<CharacterListResponse>, String> {
        let base = &self.service.config().base_url;
        let characters: Vec<CharacterSummary> = self
            .service
            .repository()
            .all()
            .iter()
            .map(|c| CharacterSummary {
                name: c.name.clone(),
                url: c.page_url(base),
            })
            .collect();

        Ok(Json(CharacterListResponse {
            count: characters.len(),
            characters,
        }))
    }

    #[tool(description = "List the race catalog loaded at startup (name, period, tier, distance, schedule).")]
    async fn list_races(&self) -> Result<Json<RaceCatalogResponse>, String> {
        let races = self.service.catalog().to_vec();
        Ok(Json(RaceCatalogResponse {
            count: races.len(),
            races,
        }))
    }
}

fn to_response(result: CharacterResult) -> CharacterDataResponse {
    let found = !result.is_not_found();
    CharacterDataResponse {
        url: result.url,
        title: result.title,
        found,
        overall_rank: result.overall_rank,
        recommended_stats: result.recommended_stats,
        events: result.events,
        matching_races: result.matching_races,
    }
}

#[tool_handler]
impl ServerHandler for UmaScrapeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "umascrape".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Umamusume character scraper. Use get_character_data with a character \
                 name or page URL to fetch that character's tier rank, recommended \
                 stats, and training events along with the known races those events \
                 mention. list_characters shows the name lookup table; list_races \
                 shows the race catalog loaded at startup."
                    .to_string(),
            ),
        }
    }
}
