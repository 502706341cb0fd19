//! Raw upstream payloads.
//!
//! These mirror the JSON returned by the Samehadaku API. Almost every field is
//! optional because the shapes vary between endpoints; the transform layer
//! decides the fallbacks.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::models::Pagination;

/// `{ "data": ..., "pagination": ... }` wrapper shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Summary record returned by every listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnime {
    #[serde(default, deserialize_with = "null_as_default")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster: String,
    #[serde(default)]
    pub released_on: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub anime_list: Vec<ApiAnime>,
}

/// `/recent` has been seen both flat and nested under `recent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentData {
    #[serde(default)]
    pub anime_list: Option<Vec<ApiAnime>>,
    #[serde(default)]
    pub recent: Option<AnimeListData>,
}

impl RecentData {
    pub fn into_list(self) -> Vec<ApiAnime> {
        match (self.anime_list, self.recent) {
            (Some(list), _) => list,
            (None, Some(nested)) => nested.anime_list,
            (None, None) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent: AnimeListData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batch: AnimeListData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub movie: AnimeListData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top10: AnimeListData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiScore {
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSynopsis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGenre {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreListData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_list: Vec<ApiGenre>,
}

/// An episode title as it comes off the wire: sometimes a number, sometimes
/// a string, sometimes absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EpisodeTitle {
    Numeric(u32),
    Text(String),
    #[default]
    Missing,
}

impl<'de> Deserialize<'de> for EpisodeTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;

        Ok(match value {
            Some(Value::Number(n)) => match n.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(v) => EpisodeTitle::Numeric(v),
                None => EpisodeTitle::Text(n.to_string()),
            },
            Some(Value::String(s)) if !s.is_empty() => EpisodeTitle::Text(s),
            _ => EpisodeTitle::Missing,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEpisodeRef {
    #[serde(default)]
    pub title: EpisodeTitle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetailData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster: String,
    #[serde(default)]
    pub score: Option<ApiScore>,
    #[serde(default)]
    pub japanese: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub studios: Option<String>,
    #[serde(default)]
    pub producers: Option<String>,
    #[serde(default)]
    pub aired: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synopsis: ApiSynopsis,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_list: Vec<ApiGenre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_list: Vec<ApiEpisodeRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNeighbourEpisode {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiServer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuality {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_list: Vec<ApiServer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiServerGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualities: Vec<ApiQuality>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDownloadUrl {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDownloadQuality {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<ApiDownloadUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDownloadFormat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualities: Vec<ApiDownloadQuality>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDownloads {
    #[serde(default, deserialize_with = "null_as_default")]
    pub formats: Vec<ApiDownloadFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecommendedEpisode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDetailData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster: String,
    #[serde(default)]
    pub released_on: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_streaming_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_prev_episode: bool,
    #[serde(default)]
    pub prev_episode: Option<ApiNeighbourEpisode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_episode: bool,
    #[serde(default)]
    pub next_episode: Option<ApiNeighbourEpisode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synopsis: ApiSynopsis,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_list: Vec<ApiGenre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server: ApiServerGroup,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_url: ApiDownloads,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_episode_list: Vec<ApiRecommendedEpisode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScheduleAnime {
    #[serde(default, deserialize_with = "null_as_default")]
    pub anime_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub score: Option<String>,
    #[serde(default)]
    pub estimation: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScheduleDay {
    #[serde(default, deserialize_with = "null_as_default")]
    pub day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anime_list: Vec<ApiScheduleAnime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<ApiScheduleDay>,
}

/// An explicit `null` decodes like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Scores and episode counts arrive as either strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_title_variants() {
        let refs: Vec<ApiEpisodeRef> = serde_json::from_str(
            r#"[
                {"title": 12, "episodeId": "a"},
                {"title": "11", "episodeId": "b"},
                {"title": null, "episodeId": "c"},
                {"episodeId": "d"},
                {"title": "", "episodeId": "e"},
                {"title": 10.5, "episodeId": "f"}
            ]"#,
        )
        .unwrap();

        assert_eq!(refs[0].title, EpisodeTitle::Numeric(12));
        assert_eq!(refs[1].title, EpisodeTitle::Text("11".to_string()));
        assert_eq!(refs[2].title, EpisodeTitle::Missing);
        assert_eq!(refs[3].title, EpisodeTitle::Missing);
        assert_eq!(refs[4].title, EpisodeTitle::Missing);
        assert_eq!(refs[5].title, EpisodeTitle::Text("10.5".to_string()));
    }

    #[test]
    fn test_score_accepts_number_and_blank() {
        let anime: Vec<ApiAnime> = serde_json::from_str(
            r#"[
                {"animeId": "a", "title": "A", "poster": "p", "score": 8.5},
                {"animeId": "b", "title": "B", "poster": "p", "score": "  "},
                {"animeId": "c", "title": "C", "poster": "p", "score": "7.12"}
            ]"#,
        )
        .unwrap();

        assert_eq!(anime[0].score.as_deref(), Some("8.5"));
        assert_eq!(anime[1].score, None);
        assert_eq!(anime[2].score.as_deref(), Some("7.12"));
    }

    #[test]
    fn test_null_decodes_as_missing() {
        let episode: EpisodeDetailData = serde_json::from_str(
            r#"{"title": null, "hasNextEpisode": null, "server": null,
                "downloadUrl": {"formats": null}, "recommendedEpisodeList": null}"#,
        )
        .unwrap();

        assert!(episode.title.is_empty());
        assert!(!episode.has_next_episode);
        assert!(episode.server.qualities.is_empty());
        assert!(episode.download_url.formats.is_empty());
        assert!(episode.recommended_episode_list.is_empty());
    }

    #[test]
    fn test_recent_data_both_shapes() {
        let flat: RecentData =
            serde_json::from_str(r#"{"animeList": [{"animeId": "x"}]}"#).unwrap();
        assert_eq!(flat.into_list().len(), 1);

        let nested: RecentData =
            serde_json::from_str(r#"{"recent": {"animeList": [{"animeId": "x"}, {"animeId": "y"}]}}"#)
                .unwrap();
        assert_eq!(nested.into_list().len(), 2);

        let empty: RecentData = serde_json::from_str("{}").unwrap();
        assert!(empty.into_list().is_empty());
    }
}
