// 🔎 Name Lookup - Jikan (MyAnimeList) REST client
//
// The only network boundary in the tool, and the only async code. Lookups
// map an id to a display title; failures degrade to the "N/A" placeholder
// instead of propagating, so a dead network never blocks list edits.

use crate::entry::UNKNOWN_TITLE;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Anime metadata returned by Jikan (only the fields the CLI shows)
#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u32,
    pub title: String,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AnimeResponse {
    data: JikanAnime,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<JikanAnime>,
}

/// Jikan API client
pub struct JikanClient {
    base_url: String,
    http: Client,
}

impl JikanClient {
    pub fn new() -> Self {
        Self::with_base_url(JIKAN_BASE_URL)
    }

    /// Point the client at a different endpoint (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Resolve an id to its display title.
    ///
    /// Never fails: any lookup problem (network, 404, decode) resolves to
    /// the "N/A" placeholder so callers can proceed with the list edit.
    pub async fn resolve_name(&self, mal_id: u32) -> String {
        match self.get_anime(mal_id).await {
            Ok(anime) => anime.title,
            Err(_) => UNKNOWN_TITLE.to_string(),
        }
    }

    /// Get anime metadata by MAL id
    pub async fn get_anime(&self, mal_id: u32) -> Result<JikanAnime> {
        let url = format!("{}/anime/{}", self.base_url, mal_id);

        let response: AnimeResponse = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("lookup of id {mal_id} failed"))?
            .json()
            .await
            .with_context(|| format!("lookup of id {mal_id} returned an unexpected shape"))?;

        Ok(response.data)
    }

    /// Search MyAnimeList by title, up to `limit` results
    pub async fn search_anime(&self, query: &str, limit: u8) -> Result<Vec<JikanAnime>> {
        let url = format!("{}/anime", self.base_url);

        let response: SearchResponse = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", &limit.to_string())])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("search for '{query}' failed"))?
            .json()
            .await
            .with_context(|| format!("search for '{query}' returned an unexpected shape"))?;

        Ok(response.data)
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network calls are out of reach for unit tests; what matters here is
    // that the response DTOs match Jikan's envelope.

    #[test]
    fn test_anime_response_envelope() {
        let raw = r#"{
            "data": {
                "mal_id": 1,
                "title": "Cowboy Bebop",
                "episodes": 26,
                "score": 8.75,
                "rank": 47
            }
        }"#;

        let response: AnimeResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response.data.mal_id, 1);
        assert_eq!(response.data.title, "Cowboy Bebop");
        assert_eq!(response.data.episodes, Some(26));
    }

    #[test]
    fn test_search_response_tolerates_missing_optionals() {
        let raw = r#"{
            "data": [
                {"mal_id": 21, "title": "One Piece", "episodes": null, "score": null}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].episodes, None);
        assert_eq!(response.data[0].score, None);
    }
}
