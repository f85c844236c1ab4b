//! TMDB movie catalog proxy
//!
//! Keeps the API key on the server. List lookups degrade to an empty list
//! when TMDB fails; detail lookups turn into 404s.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::{ServiceError, ServiceResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MOOD_PICKS: usize = 12;

// MARK: - TMDB Models

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Movie as returned by TMDB; fields we don't model pass through untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credit {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<Credit>,
    #[serde(default)]
    pub crew: Vec<Credit>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

// MARK: - Moods

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Relaxed,
}

impl std::str::FromStr for Mood {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "excited" => Ok(Mood::Excited),
            "relaxed" => Ok(Mood::Relaxed),
            _ => Err(ServiceError::NotFound("Mood not found".to_string())),
        }
    }
}

impl Mood {
    pub fn key(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
            Mood::Relaxed => "relaxed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Mood::Happy => "Mutlu Eden Filmler",
            Mood::Sad => "Duygusal Filmler",
            Mood::Excited => "Heyecan Verici Filmler",
            Mood::Relaxed => "Rahatlatıcı Filmler",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mood::Happy => "Keyifli vakit geçirmenizi sağlayacak filmler",
            Mood::Sad => "Hislerinize tercüman olacak filmler",
            Mood::Excited => "Adrenalin dolu macera filmleri",
            Mood::Relaxed => "Sakin ve huzurlu filmler",
        }
    }

    /// Two TMDB genre ids blended for this mood
    pub fn genres(self) -> [u64; 2] {
        match self {
            Mood::Happy => [35, 10751],   // Comedy, Family
            Mood::Sad => [18, 10749],     // Drama, Romance
            Mood::Excited => [28, 12],    // Action, Adventure
            Mood::Relaxed => [99, 36],    // Documentary, History
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodRecommendations {
    pub mood: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub movies: Vec<Movie>,
}

/// Concatenate, shuffle and keep at most `limit`.
pub fn blend<T, R: Rng + ?Sized>(first: Vec<T>, second: Vec<T>, limit: usize, rng: &mut R) -> Vec<T> {
    let mut merged = first;
    merged.extend(second);
    merged.shuffle(rng);
    merged.truncate(limit);
    merged
}

// MARK: - Client

#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl CatalogClient {
    /// `None` when no API key is configured.
    pub fn from_config(config: &CatalogConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ServiceResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = %path, "Calling TMDB");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("TMDB rejected the API key");
        }
        if !status.is_success() {
            return Err(ServiceError::Upstream(format!("TMDB {} returned {}", path, status)));
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Vec<T> {
        match self.fetch::<Page<T>>(path, params).await {
            Ok(page) => page.results,
            Err(e) => {
                warn!(path = %path, error = %e, "TMDB list lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch_detail<T: DeserializeOwned>(&self, path: &str, what: &str) -> ServiceResult<T> {
        self.fetch::<T>(path, &[]).await.map_err(|e| {
            warn!(path = %path, error = %e, "TMDB detail lookup failed");
            ServiceError::NotFound(format!("{} not found", what))
        })
    }

    pub async fn trending_movies(&self) -> Vec<Movie> {
        self.fetch_list("/trending/movie/week", &[]).await
    }

    pub async fn trending_shows(&self) -> Vec<Show> {
        self.fetch_list("/trending/tv/week", &[]).await
    }

    pub async fn search_movies(&self, query: &str) -> Vec<Movie> {
        self.fetch_list("/search/movie", &[("query", query.to_string())])
            .await
    }

    pub async fn movie_details(&self, id: u64) -> ServiceResult<Movie> {
        self.fetch_detail(&format!("/movie/{}", id), "Movie").await
    }

    pub async fn movie_credits(&self, id: u64) -> ServiceResult<Credits> {
        self.fetch_detail(&format!("/movie/{}/credits", id), "Credits")
            .await
    }

    pub async fn movie_recommendations(&self, id: u64) -> Vec<Movie> {
        self.fetch_list(&format!("/movie/{}/recommendations", id), &[])
            .await
    }

    pub async fn movies_by_genre(&self, genre_id: u64) -> Vec<Movie> {
        self.fetch_list(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    pub async fn show_details(&self, id: u64) -> ServiceResult<Show> {
        self.fetch_detail(&format!("/tv/{}", id), "Show").await
    }

    pub async fn show_credits(&self, id: u64) -> ServiceResult<Credits> {
        self.fetch_detail(&format!("/tv/{}/credits", id), "Credits")
            .await
    }

    pub async fn show_recommendations(&self, id: u64) -> Vec<Show> {
        self.fetch_list(&format!("/tv/{}/recommendations", id), &[])
            .await
    }

    /// Movies from both of the mood's genres, shuffled, at most twelve.
    pub async fn mood_recommendations(&self, mood: Mood) -> MoodRecommendations {
        let [first, second] = mood.genres();
        let (first, second) =
            futures::join!(self.movies_by_genre(first), self.movies_by_genre(second));

        MoodRecommendations {
            mood: mood.key(),
            title: mood.title(),
            description: mood.description(),
            movies: blend(first, second, MOOD_PICKS, &mut rand::thread_rng()),
        }
    }
}
