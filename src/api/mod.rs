//! Samehadaku API access.
//!
//! One function per upstream endpoint. Each performs a single GET, checks the
//! status, decodes the `data` envelope and hands it to [`transform`].

pub mod cache;
pub mod models;
pub mod transform;
pub mod types;

use std::sync::Arc;

use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::{Error, Result};

pub use cache::{CachePolicy, ResponseCache};
pub use models::{
    Anime, Episode, Genre, HomeFeed, Page, Pagination, Schedule, StreamKind, StreamSource,
    WatchEpisode,
};
use types::{
    AnimeDetailData, AnimeListData, Envelope, EpisodeDetailData, GenreListData, HomeData,
    RecentData, ScheduleData, ServerData,
};

/// Everything the front-end can ask of the content source.
#[async_trait::async_trait]
pub trait AnimeSource {
    async fn home(&self, policy: CachePolicy) -> Result<HomeFeed>;
    async fn server(&self, server_id: &str, policy: CachePolicy) -> Result<StreamSource>;
    async fn episode(&self, episode_id: &str, policy: CachePolicy) -> Result<WatchEpisode>;
    /// Never fails; the catalog only feeds navigation.
    async fn genres(&self, policy: CachePolicy) -> Vec<Genre>;
    async fn anime_by_genre(&self, genre_id: &str, page: u32, policy: CachePolicy)
    -> Result<Page<Anime>>;
    async fn anime_detail(&self, anime_id: &str, policy: CachePolicy) -> Result<Anime>;
    async fn search(&self, query: &str, page: u32, policy: CachePolicy) -> Result<Page<Anime>>;
    async fn recent(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>>;
    async fn movies(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>>;
    async fn popular(&self, policy: CachePolicy) -> Result<Vec<Anime>>;
    async fn ongoing(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>>;
    async fn schedule(&self, policy: CachePolicy) -> Result<Schedule>;
    async fn completed(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>>;
}

/// Where listing entries get their `type` from.
#[derive(Debug, Clone, Copy)]
enum ListingType {
    Fixed(&'static str),
    /// The record's own `type`, else "TV"
    FromRecord,
}

fn to_page(envelope: Envelope<AnimeListData>, listing_type: ListingType) -> Page<Anime> {
    let items = match listing_type {
        ListingType::Fixed(kind) => transform::to_anime_list(&envelope.data.anime_list, kind),
        ListingType::FromRecord => transform::to_anime_list_typed(&envelope.data.anime_list),
    };

    Page {
        items,
        pagination: envelope.pagination,
    }
}

/// Decode a response body into its envelope, naming `endpoint` on failure.
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Envelope<T>> {
    serde_json::from_str(body).map_err(|e| Error::fetch(endpoint, format!("invalid JSON: {}", e)))
}

pub struct SamehadakuClient {
    client: Client,
    base_url: String,
    cache: ResponseCache,
}

impl SamehadakuClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_http_client(&config.base_url, client))
    }

    pub fn with_http_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
        policy: CachePolicy,
    ) -> Result<Envelope<T>> {
        let request = self
            .client
            .get(self.url(path))
            .query(query)
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, policy.header_value())
            .build()
            .map_err(|e| Error::fetch(endpoint, e))?;
        let key = request.url().to_string();

        if let Some(body) = self.cache.get(&key, policy) {
            return decode(endpoint, &body);
        }

        debug!(endpoint, url = %key, "Fetching");

        let response = self.client.execute(request).await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed");
            Error::fetch(endpoint, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = %status, "Upstream returned an error status");
            return Err(Error::fetch(endpoint, format!("HTTP {}", status)));
        }

        let body: Arc<str> = response
            .text()
            .await
            .map_err(|e| Error::fetch(endpoint, e))?
            .into();

        let envelope = decode(endpoint, &body)?;
        self.cache.put(&key, body, policy);
        Ok(envelope)
    }

    async fn listing(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
        listing_type: ListingType,
        policy: CachePolicy,
    ) -> Result<Page<Anime>> {
        let envelope = self
            .get_json::<AnimeListData>(endpoint, path, query, policy)
            .await?;
        Ok(to_page(envelope, listing_type))
    }
}

fn page_query(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

#[async_trait::async_trait]
impl AnimeSource for SamehadakuClient {
    async fn home(&self, policy: CachePolicy) -> Result<HomeFeed> {
        let envelope = self.get_json::<HomeData>("home", "/home", &[], policy).await?;
        Ok(transform::to_home_feed(&envelope.data))
    }

    async fn server(&self, server_id: &str, policy: CachePolicy) -> Result<StreamSource> {
        let path = format!("/server/{}", urlencoding::encode(server_id));
        let envelope = self
            .get_json::<ServerData>("server", &path, &[], policy)
            .await?;
        Ok(transform::to_stream_source(&envelope.data))
    }

    async fn episode(&self, episode_id: &str, policy: CachePolicy) -> Result<WatchEpisode> {
        let path = format!("/episode/{}", urlencoding::encode(episode_id));
        let envelope = self
            .get_json::<EpisodeDetailData>("episode", &path, &[], policy)
            .await?;
        Ok(transform::to_watch_episode(episode_id, &envelope.data))
    }

    async fn genres(&self, policy: CachePolicy) -> Vec<Genre> {
        match self
            .get_json::<GenreListData>("genres", "/genres", &[], policy)
            .await
        {
            Ok(envelope) => envelope
                .data
                .genre_list
                .iter()
                .map(transform::to_genre)
                .collect(),
            Err(e) => {
                error!(error = %e, "Genre catalog unavailable, showing none");
                Vec::new()
            }
        }
    }

    async fn anime_by_genre(
        &self,
        genre_id: &str,
        page: u32,
        policy: CachePolicy,
    ) -> Result<Page<Anime>> {
        let path = format!("/genres/{}", urlencoding::encode(genre_id));
        self.listing(
            "genre listing",
            &path,
            &[page_query(page)],
            ListingType::Fixed(transform::DEFAULT_TYPE),
            policy,
        )
        .await
    }

    async fn anime_detail(&self, anime_id: &str, policy: CachePolicy) -> Result<Anime> {
        let path = format!("/anime/{}", urlencoding::encode(anime_id));
        let envelope = self
            .get_json::<AnimeDetailData>("anime detail", &path, &[], policy)
            .await?;
        Ok(transform::to_anime_detail(anime_id, &envelope.data))
    }

    async fn search(&self, query: &str, page: u32, policy: CachePolicy) -> Result<Page<Anime>> {
        self.listing(
            "search",
            "/search",
            &[("q", query.to_string()), page_query(page)],
            ListingType::Fixed(transform::DEFAULT_TYPE),
            policy,
        )
        .await
    }

    async fn recent(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>> {
        let envelope = self
            .get_json::<RecentData>("recent", "/recent", &[page_query(page)], policy)
            .await?;

        Ok(Page {
            items: transform::to_anime_list(&envelope.data.into_list(), transform::DEFAULT_TYPE),
            pagination: envelope.pagination,
        })
    }

    async fn movies(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>> {
        self.listing(
            "movies",
            "/movies",
            &[page_query(page)],
            ListingType::Fixed("Movie"),
            policy,
        )
        .await
    }

    async fn popular(&self, policy: CachePolicy) -> Result<Vec<Anime>> {
        let page = self
            .listing("popular", "/popular", &[], ListingType::FromRecord, policy)
            .await?;
        Ok(page.items)
    }

    async fn ongoing(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>> {
        self.listing(
            "ongoing",
            "/ongoing",
            &[page_query(page)],
            ListingType::FromRecord,
            policy,
        )
        .await
    }

    async fn schedule(&self, policy: CachePolicy) -> Result<Schedule> {
        let envelope = self
            .get_json::<ScheduleData>("schedule", "/schedule", &[], policy)
            .await?;
        Ok(transform::to_schedule(&envelope.data))
    }

    async fn completed(&self, page: u32, policy: CachePolicy) -> Result<Page<Anime>> {
        self.listing(
            "completed",
            "/completed",
            &[page_query(page)],
            ListingType::FromRecord,
            policy,
        )
        .await
    }
}
