use serde::{Deserialize, Serialize};

use super::types::null_as_default;

/// Normalized anime, independent of which endpoint it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Anime {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub banner: String,
    pub genre: Vec<String>,
    pub rating: String,
    pub year: i32,
    pub kind: String,
    pub status: String,
    /// Ascending by `number`
    pub episodes: Vec<Episode>,
    pub japanese: Option<String>,
    pub producers: Option<String>,
    pub studios: Option<String>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
}

/// Listing pagination, passed through from upstream untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    #[serde(deserialize_with = "null_as_default")]
    pub current_page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub has_prev_page: bool,
    pub prev_page: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub has_next_page: bool,
    pub next_page: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn next_page(&self) -> Option<u32> {
        self.pagination
            .as_ref()
            .filter(|p| p.has_next_page)
            .and_then(|p| p.next_page)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.pagination
            .as_ref()
            .filter(|p| p.has_prev_page)
            .and_then(|p| p.prev_page)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    pub recent: Vec<Anime>,
    pub batch: Vec<Anime>,
    pub movie: Vec<Anime>,
    pub top10: Vec<Anime>,
}

impl HomeFeed {
    /// The hero pick: first of the top 10, else the newest release
    pub fn featured(&self) -> Option<&Anime> {
        self.top10.first().or_else(|| self.recent.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Third-party player page, only usable as an embed
    Embed,
    /// Media file or HLS playlist a player can open directly
    Direct,
}

impl StreamKind {
    /// `.mp4`, `.m3u8` and `.webm` URLs play directly; anything else is an embed page.
    pub fn classify(url: &str) -> Self {
        const DIRECT_EXTENSIONS: &[&str] = &[".mp4", ".m3u8", ".webm"];

        let lower = url.trim().to_lowercase();
        if lower.contains("blogger.com") || lower.contains("video.g") {
            return StreamKind::Embed;
        }

        let path = lower
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let is_direct = DIRECT_EXTENSIONS
            .iter()
            .any(|ext| lower.ends_with(ext) || path.ends_with(ext));

        if is_direct {
            StreamKind::Direct
        } else {
            StreamKind::Embed
        }
    }

    pub fn as_display(&self) -> &'static str {
        match self {
            StreamKind::Embed => "embed",
            StreamKind::Direct => "direct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource {
    pub url: String,
    pub kind: StreamKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLink {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: String,
    pub title: String,
    /// Short button label with the quality prefix stripped
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    pub title: String,
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadQuality {
    pub title: String,
    pub links: Vec<DownloadLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFormat {
    pub title: String,
    pub qualities: Vec<DownloadQuality>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedEpisode {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub release_date: String,
}

/// Everything the watch view needs for one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEpisode {
    pub id: String,
    pub title: String,
    pub anime_id: String,
    pub poster: String,
    pub released_on: String,
    pub stream: StreamSource,
    pub prev_episode: Option<EpisodeLink>,
    pub next_episode: Option<EpisodeLink>,
    pub synopsis: String,
    pub genres: Vec<Genre>,
    pub qualities: Vec<Quality>,
    pub downloads: Vec<DownloadFormat>,
    pub recommended: Vec<RecommendedEpisode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub anime: Anime,
    pub estimation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDay {
    pub day: String,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub days: Vec<ScheduleDay>,
}
