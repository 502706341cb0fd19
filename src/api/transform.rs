//! Raw API payloads -> view models.
//!
//! Every function here is pure and single-pass. Missing or malformed optional
//! fields resolve to literal fallbacks and never fail.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use tracing::warn;

use super::models::{
    Anime, DownloadFormat, DownloadLink, DownloadQuality, Episode, EpisodeLink, Genre, HomeFeed,
    Quality, RecommendedEpisode, Schedule, ScheduleDay, ScheduleEntry, Server, StreamKind,
    StreamSource, WatchEpisode,
};
use super::types::{
    AnimeDetailData, ApiAnime, ApiEpisodeRef, ApiGenre, ApiNeighbourEpisode, ApiScheduleAnime,
    EpisodeDetailData, EpisodeTitle, HomeData, ScheduleData, ServerData,
};

/// Year used when no release date can be parsed
pub const FALLBACK_YEAR: i32 = 2026;
pub const FALLBACK_RATING: &str = "N/A";
pub const FALLBACK_STATUS: &str = "Released";
pub const FALLBACK_TITLE: &str = "Unknown Title";
pub const DEFAULT_TYPE: &str = "TV";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%m/%d/%Y",
];

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Pull a calendar year out of an upstream date string.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.year());
        }
    }

    YEAR_PATTERN
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
}

fn year_or_fallback(raw: Option<&str>) -> i32 {
    raw.and_then(parse_year).unwrap_or(FALLBACK_YEAR)
}

/// Treats empty and whitespace-only strings as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Summary record from any listing endpoint.
///
/// Description, genres and episodes stay empty; only the detail endpoint
/// carries them.
pub fn to_anime_summary(raw: &ApiAnime, fallback_type: &str) -> Anime {
    Anime {
        id: raw.anime_id.clone(),
        title: raw.title.clone(),
        description: String::new(),
        thumbnail: raw.poster.clone(),
        banner: raw.poster.clone(),
        genre: Vec::new(),
        rating: raw
            .score
            .clone()
            .unwrap_or_else(|| FALLBACK_RATING.to_string()),
        year: year_or_fallback(raw.release_date.as_deref()),
        kind: fallback_type.to_string(),
        status: present(raw.released_on.as_deref())
            .unwrap_or(FALLBACK_STATUS)
            .to_string(),
        episodes: Vec::new(),
        japanese: None,
        producers: None,
        studios: None,
        synopsis: None,
    }
}

/// Summary using the record's own `type` when it has one.
pub fn to_anime_summary_typed(raw: &ApiAnime) -> Anime {
    let kind = present(raw.kind.as_deref()).unwrap_or(DEFAULT_TYPE);
    to_anime_summary(raw, kind)
}

pub fn to_anime_list(raw: &[ApiAnime], fallback_type: &str) -> Vec<Anime> {
    raw.iter().map(|a| to_anime_summary(a, fallback_type)).collect()
}

pub fn to_anime_list_typed(raw: &[ApiAnime]) -> Vec<Anime> {
    raw.iter().map(to_anime_summary_typed).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOrder {
    /// Explicit numbers never increase along the raw list
    NewestFirst,
    /// Raw position `position` carries a higher number than its predecessor
    Inconsistent { position: usize },
}

/// parseInt-style: optional leading whitespace and `+`, then a digit run.
fn leading_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}

fn explicit_number(title: &EpisodeTitle) -> Option<u32> {
    match title {
        EpisodeTitle::Numeric(n) => Some(*n),
        EpisodeTitle::Text(s) => leading_int(s),
        EpisodeTitle::Missing => None,
    }
    .filter(|n| *n > 0)
}

/// Check the newest-first assumption the positional fallback relies on.
pub fn check_episode_order(raw: &[ApiEpisodeRef]) -> EpisodeOrder {
    let mut previous: Option<u32> = None;

    for (position, ep) in raw.iter().enumerate() {
        let Some(number) = explicit_number(&ep.title) else {
            continue;
        };
        if previous.is_some_and(|prev| number > prev) {
            return EpisodeOrder::Inconsistent { position };
        }
        previous = Some(number);
    }

    EpisodeOrder::NewestFirst
}

/// Number for the raw entry at `position`, counting back from `total` when
/// the title carries none.
pub fn episode_number(title: &EpisodeTitle, position: usize, total: usize) -> u32 {
    explicit_number(title).unwrap_or_else(|| total.saturating_sub(position).max(1) as u32)
}

fn episode_title(title: &EpisodeTitle, number: u32) -> String {
    match title {
        EpisodeTitle::Numeric(n) if *n > 0 => format!("Episode {}", n),
        EpisodeTitle::Text(s) => format!("Episode {}", s),
        _ => format!("Episode {}", number),
    }
}

/// Number the raw (newest-first) list, then flip it to ascending order.
fn to_episodes(raw: &[ApiEpisodeRef], thumbnail: &str, duration: &str) -> Vec<Episode> {
    let total = raw.len();
    let order = check_episode_order(raw);

    // Numbers must be assigned before the reversal or the positional fallback shifts.
    let mut episodes: Vec<Episode> = raw
        .iter()
        .enumerate()
        .map(|(i, ep)| {
            let number = episode_number(&ep.title, i, total);
            Episode {
                id: ep.episode_id.clone(),
                number,
                title: episode_title(&ep.title, number),
                thumbnail: thumbnail.to_string(),
                duration: duration.to_string(),
            }
        })
        .collect();
    episodes.reverse();

    if let EpisodeOrder::Inconsistent { position } = order {
        warn!(
            position,
            total, "Episode list is not newest-first, sorting by number"
        );
        episodes.sort_by_key(|ep| ep.number);
    }

    episodes
}

fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}

/// Full detail payload for the anime requested as `id`.
pub fn to_anime_detail(id: &str, raw: &AnimeDetailData) -> Anime {
    let title = present(raw.title.as_deref())
        .or_else(|| present(raw.english.as_deref()))
        .or_else(|| present(raw.japanese.as_deref()))
        .unwrap_or(FALLBACK_TITLE)
        .to_string();

    let description = join_paragraphs(&raw.synopsis.paragraphs);

    let rating = present(raw.score.as_ref().and_then(|s| s.value.as_deref()))
        .unwrap_or(FALLBACK_RATING)
        .to_string();

    let aired_start = raw
        .aired
        .as_deref()
        .and_then(|aired| aired.split(" to ").next());

    let duration = raw.duration.clone().unwrap_or_default();

    Anime {
        id: id.to_string(),
        title,
        description: description.clone(),
        thumbnail: raw.poster.clone(),
        banner: raw.poster.clone(),
        genre: raw.genre_list.iter().map(|g| g.title.clone()).collect(),
        rating,
        year: year_or_fallback(aired_start),
        kind: present(raw.kind.as_deref())
            .unwrap_or(DEFAULT_TYPE)
            .to_string(),
        status: present(raw.status.as_deref())
            .unwrap_or(FALLBACK_STATUS)
            .to_string(),
        episodes: to_episodes(&raw.episode_list, &raw.poster, &duration),
        japanese: raw.japanese.clone(),
        producers: raw.producers.clone(),
        studios: raw.studios.clone(),
        synopsis: Some(description),
    }
}

pub fn to_home_feed(raw: &HomeData) -> HomeFeed {
    HomeFeed {
        recent: to_anime_list(&raw.recent.anime_list, DEFAULT_TYPE),
        batch: to_anime_list(&raw.batch.anime_list, "Batch"),
        movie: to_anime_list(&raw.movie.anime_list, "Movie"),
        top10: to_anime_list(&raw.top10.anime_list, DEFAULT_TYPE),
    }
}

pub fn to_genre(raw: &ApiGenre) -> Genre {
    Genre {
        id: raw.genre_id.clone(),
        title: raw.title.clone(),
    }
}

/// Direct URLs stay direct unless the server explicitly marks them as iframes.
pub fn to_stream_source(raw: &ServerData) -> StreamSource {
    let kind = match raw.kind.as_deref() {
        Some(k) if k.eq_ignore_ascii_case("iframe") => StreamKind::Embed,
        _ => StreamKind::classify(&raw.url),
    };

    StreamSource {
        url: raw.url.clone(),
        kind,
    }
}

/// Strip the quality name from a server title, e.g. "720p Nakama" -> "Nakama".
pub fn server_label(server_title: &str, quality_title: &str) -> String {
    let label = if quality_title.is_empty() {
        server_title.to_string()
    } else {
        server_title.replacen(quality_title, "", 1)
    };

    match label.trim() {
        "" => "SV 1".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn to_episode_link(flag: bool, raw: Option<&ApiNeighbourEpisode>) -> Option<EpisodeLink> {
    if !flag {
        return None;
    }
    let raw = raw.filter(|r| !r.episode_id.is_empty())?;

    Some(EpisodeLink {
        id: raw.episode_id.clone(),
        title: present(raw.title.as_deref())
            .unwrap_or(&raw.episode_id)
            .to_string(),
    })
}

pub fn to_watch_episode(id: &str, raw: &EpisodeDetailData) -> WatchEpisode {
    let qualities = raw
        .server
        .qualities
        .iter()
        .map(|q| Quality {
            title: q.title.clone(),
            servers: q
                .server_list
                .iter()
                .map(|s| Server {
                    id: s.server_id.clone(),
                    title: s.title.clone(),
                    label: server_label(&s.title, &q.title),
                })
                .collect(),
        })
        .collect();

    let downloads = raw
        .download_url
        .formats
        .iter()
        .map(|f| DownloadFormat {
            title: f.title.clone(),
            qualities: f
                .qualities
                .iter()
                .map(|q| DownloadQuality {
                    title: q.title.clone(),
                    links: q
                        .urls
                        .iter()
                        .map(|u| DownloadLink {
                            title: u.title.clone(),
                            url: u.url.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let recommended = raw
        .recommended_episode_list
        .iter()
        .map(|r| RecommendedEpisode {
            id: r.episode_id.clone(),
            title: r.title.clone(),
            poster: r.poster.clone(),
            release_date: r.release_date.clone().unwrap_or_default(),
        })
        .collect();

    WatchEpisode {
        id: id.to_string(),
        title: raw.title.clone(),
        anime_id: raw.anime_id.clone(),
        poster: raw.poster.clone(),
        released_on: raw.released_on.clone().unwrap_or_default(),
        stream: StreamSource {
            url: raw.default_streaming_url.clone(),
            kind: StreamKind::classify(&raw.default_streaming_url),
        },
        prev_episode: to_episode_link(raw.has_prev_episode, raw.prev_episode.as_ref()),
        next_episode: to_episode_link(raw.has_next_episode, raw.next_episode.as_ref()),
        synopsis: join_paragraphs(&raw.synopsis.paragraphs),
        genres: raw.genre_list.iter().map(to_genre).collect(),
        qualities,
        downloads,
        recommended,
    }
}

fn to_schedule_entry(raw: &ApiScheduleAnime) -> ScheduleEntry {
    let summary = ApiAnime {
        anime_id: raw.anime_id.clone(),
        title: raw.title.clone(),
        poster: raw.poster.clone(),
        score: raw.score.clone(),
        kind: raw.kind.clone(),
        ..ApiAnime::default()
    };

    let mut anime = to_anime_summary_typed(&summary);
    anime.genre = raw
        .genres
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect();

    ScheduleEntry {
        anime,
        estimation: raw.estimation.clone().unwrap_or_default(),
    }
}

pub fn to_schedule(raw: &ScheduleData) -> Schedule {
    Schedule {
        days: raw
            .days
            .iter()
            .map(|d| ScheduleDay {
                day: d.day.clone(),
                entries: d.anime_list.iter().map(to_schedule_entry).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_from(json: &str) -> AnimeDetailData {
        serde_json::from_str(json).unwrap()
    }

    fn numbers(anime: &Anime) -> Vec<u32> {
        anime.episodes.iter().map(|e| e.number).collect()
    }

    #[test]
    fn test_summary_without_score_or_date() {
        let raw: ApiAnime = serde_json::from_str(
            r#"{"animeId": "x1", "title": "Foo", "poster": "http://img"}"#,
        )
        .unwrap();

        let anime = to_anime_summary(&raw, "Movie");
        assert_eq!(anime.id, "x1");
        assert_eq!(anime.title, "Foo");
        assert_eq!(anime.thumbnail, "http://img");
        assert_eq!(anime.banner, "http://img");
        assert_eq!(anime.rating, "N/A");
        assert_eq!(anime.year, FALLBACK_YEAR);
        assert_eq!(anime.kind, "Movie");
        assert_eq!(anime.status, "Released");
        assert!(anime.description.is_empty());
        assert!(anime.genre.is_empty());
        assert!(anime.episodes.is_empty());
    }

    #[test]
    fn test_summary_keeps_present_fields() {
        let raw: ApiAnime = serde_json::from_str(
            r#"{"animeId": "a", "title": "A", "poster": "p", "score": "8.21",
                "releaseDate": "Oct 5, 2024", "releasedOn": "Ongoing", "type": "ONA"}"#,
        )
        .unwrap();

        let anime = to_anime_summary(&raw, DEFAULT_TYPE);
        assert_eq!(anime.rating, "8.21");
        assert_eq!(anime.year, 2024);
        assert_eq!(anime.status, "Ongoing");
        assert_eq!(anime.kind, "TV");
        assert_eq!(to_anime_summary_typed(&raw).kind, "ONA");
    }

    #[test]
    fn test_summary_unparseable_date_falls_back() {
        let raw = ApiAnime {
            release_date: Some("3 hari yang lalu".to_string()),
            ..ApiAnime::default()
        };
        assert_eq!(to_anime_summary(&raw, DEFAULT_TYPE).year, FALLBACK_YEAR);
    }

    #[test]
    fn test_summary_blank_released_on_falls_back() {
        let raw: ApiAnime = serde_json::from_str(
            r#"{"animeId": "a", "title": "A", "poster": "p", "releasedOn": "  "}"#,
        )
        .unwrap();
        assert_eq!(to_anime_summary(&raw, DEFAULT_TYPE).status, "Released");
    }

    #[test]
    fn test_parse_year_formats() {
        assert_eq!(parse_year("2023-04-09"), Some(2023));
        assert_eq!(parse_year("Apr 9, 2023"), Some(2023));
        assert_eq!(parse_year("9 April 2023"), Some(2023));
        assert_eq!(parse_year("2023-04-09T10:00:00+07:00"), Some(2023));
        assert_eq!(parse_year("Spring 2019"), Some(2019));
        assert_eq!(parse_year("2021"), Some(2021));
        assert_eq!(parse_year("?"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_detail_positional_fallback_numbers() {
        let anime = to_anime_detail(
            "show",
            &detail_from(
                r#"{"title": "Show", "poster": "p", "episodeList": [
                    {"title": "Finale", "episodeId": "e4"},
                    {"title": null, "episodeId": "e3"},
                    {"episodeId": "e2"},
                    {"title": "Pilot", "episodeId": "e1"}
                ]}"#,
            ),
        );

        assert_eq!(numbers(&anime), vec![1, 2, 3, 4]);
        // Raw position 0 got N and ends last
        assert_eq!(anime.episodes.last().unwrap().id, "e4");
        assert_eq!(anime.episodes.last().unwrap().title, "Episode Finale");
        assert_eq!(anime.episodes[1].title, "Episode 2");
    }

    #[test]
    fn test_detail_mixed_titles() {
        let anime = to_anime_detail(
            "show",
            &detail_from(
                r#"{"title": "Show", "poster": "p", "episodeList": [
                    {"title": "5", "episodeId": "e5"},
                    {"title": "4", "episodeId": "e4"},
                    {"title": null, "episodeId": "ex"}
                ]}"#,
            ),
        );

        assert_eq!(numbers(&anime), vec![1, 4, 5]);
        assert_eq!(anime.episodes[0].id, "ex");
        assert_eq!(anime.episodes[0].title, "Episode 1");
        assert_eq!(anime.episodes[2].title, "Episode 5");
    }

    #[test]
    fn test_detail_numeric_titles_and_parse_int_prefix() {
        let anime = to_anime_detail(
            "show",
            &detail_from(
                r#"{"poster": "p", "duration": "24 min", "episodeList": [
                    {"title": 12, "episodeId": "e12"},
                    {"title": "11 END", "episodeId": "e11"},
                    {"title": 0, "episodeId": "e0"}
                ]}"#,
            ),
        );

        // 0 is not a usable number, so position 2 of 3 falls back to 1
        assert_eq!(numbers(&anime), vec![1, 11, 12]);
        assert_eq!(anime.episodes[0].title, "Episode 1");
        assert_eq!(anime.episodes[1].title, "Episode 11 END");
        assert_eq!(anime.episodes[2].duration, "24 min");
        assert_eq!(anime.episodes[2].thumbnail, "p");
    }

    #[test]
    fn test_detail_title_precedence() {
        let english = to_anime_detail(
            "a",
            &detail_from(r#"{"english": "Bar", "japanese": "Baa"}"#),
        );
        assert_eq!(english.title, "Bar");

        let japanese = to_anime_detail("a", &detail_from(r#"{"title": " ", "japanese": "Baa"}"#));
        assert_eq!(japanese.title, "Baa");

        let unknown = to_anime_detail("a", &detail_from("{}"));
        assert_eq!(unknown.title, "Unknown Title");
    }

    #[test]
    fn test_detail_fields() {
        let anime = to_anime_detail(
            "frieren",
            &detail_from(
                r#"{
                    "title": "Frieren",
                    "poster": "https://v1.samehadaku.how/p.jpg",
                    "score": {"value": " 9.1 ", "users": "1000"},
                    "japanese": "葬送のフリーレン",
                    "status": "Completed",
                    "type": "TV",
                    "studios": "Madhouse",
                    "producers": "Aniplex",
                    "aired": "Sep 29, 2023 to Mar 22, 2024",
                    "synopsis": {"paragraphs": ["One.", "Two."]},
                    "genreList": [{"title": "Adventure", "genreId": "adventure"}]
                }"#,
            ),
        );

        assert_eq!(anime.id, "frieren");
        assert_eq!(anime.rating, "9.1");
        assert_eq!(anime.year, 2023);
        assert_eq!(anime.description, "One.\n\nTwo.");
        assert_eq!(anime.synopsis.as_deref(), Some("One.\n\nTwo."));
        assert_eq!(anime.genre, vec!["Adventure".to_string()]);
        assert_eq!(anime.status, "Completed");
        assert_eq!(anime.studios.as_deref(), Some("Madhouse"));
        assert_eq!(anime.producers.as_deref(), Some("Aniplex"));
    }

    #[test]
    fn test_detail_missing_score_and_aired() {
        let anime = to_anime_detail("a", &detail_from(r#"{"title": "A", "aired": "?"}"#));
        assert_eq!(anime.rating, "N/A");
        assert_eq!(anime.year, FALLBACK_YEAR);
        assert_eq!(anime.kind, "TV");
        assert_eq!(anime.status, "Released");
    }

    #[test]
    fn test_detail_is_idempotent() {
        let raw = detail_from(
            r#"{"title": "Show", "poster": "p", "episodeList": [
                {"title": "2", "episodeId": "b"}, {"title": null, "episodeId": "a"}
            ]}"#,
        );
        assert_eq!(to_anime_detail("s", &raw), to_anime_detail("s", &raw));
    }

    #[test]
    fn test_inconsistent_order_is_detected_and_sorted() {
        let raw = detail_from(
            r#"{"title": "Show", "episodeList": [
                {"title": "1", "episodeId": "e1"},
                {"title": "2", "episodeId": "e2"},
                {"title": "3", "episodeId": "e3"}
            ]}"#,
        );

        assert_eq!(
            check_episode_order(&raw.episode_list),
            EpisodeOrder::Inconsistent { position: 1 }
        );
        let anime = to_anime_detail("s", &raw);
        assert_eq!(numbers(&anime), vec![1, 2, 3]);
    }

    #[test]
    fn test_newest_first_order_is_accepted() {
        let raw = detail_from(
            r#"{"episodeList": [
                {"title": "3", "episodeId": "c"},
                {"title": "Special", "episodeId": "s"},
                {"title": "2", "episodeId": "b"}
            ]}"#,
        );
        assert_eq!(check_episode_order(&raw.episode_list), EpisodeOrder::NewestFirst);
    }

    #[test]
    fn test_server_label() {
        assert_eq!(server_label("720p Nakama", "720p"), "Nakama");
        assert_eq!(server_label("720p", "720p"), "SV 1");
        assert_eq!(server_label("Mega 1080p", "480p"), "Mega 1080p");
    }

    #[test]
    fn test_watch_episode() {
        let raw: EpisodeDetailData = serde_json::from_str(
            r#"{
                "title": "Show Episode 3",
                "animeId": "show",
                "poster": "p",
                "releasedOn": "2 days ago",
                "defaultStreamingUrl": "https://www.blogger.com/video.g?token=abc",
                "hasPrevEpisode": true,
                "prevEpisode": {"title": "Episode 2", "episodeId": "show-2"},
                "hasNextEpisode": false,
                "nextEpisode": null,
                "synopsis": {"paragraphs": ["A", "B"]},
                "genreList": [{"title": "Action", "genreId": "action"}],
                "server": {"qualities": [
                    {"title": "360p", "serverList": [{"title": "360p Blogspot", "serverId": "s1"}]}
                ]},
                "downloadUrl": {"formats": [
                    {"title": "MKV", "qualities": [{"title": "720p", "urls": [{"title": "Gofile", "url": "https://g/1"}]}]}
                ]},
                "recommendedEpisodeList": [{"title": "Other 1", "poster": "q", "episodeId": "other-1"}]
            }"#,
        )
        .unwrap();

        let ep = to_watch_episode("show-3", &raw);
        assert_eq!(ep.id, "show-3");
        assert_eq!(ep.stream.kind, StreamKind::Embed);
        assert_eq!(ep.prev_episode.as_ref().map(|l| l.id.as_str()), Some("show-2"));
        assert!(ep.next_episode.is_none());
        assert_eq!(ep.synopsis, "A\n\nB");
        assert_eq!(ep.qualities[0].servers[0].label, "Blogspot");
        assert_eq!(ep.downloads[0].qualities[0].links[0].url, "https://g/1");
        assert_eq!(ep.recommended[0].release_date, "");
        assert_eq!(ep.genres[0].id, "action");
    }

    #[test]
    fn test_stream_source_honours_iframe_type() {
        let direct = to_stream_source(&ServerData {
            url: "https://cdn/ep.mp4".to_string(),
            kind: None,
        });
        assert_eq!(direct.kind, StreamKind::Direct);

        let forced = to_stream_source(&ServerData {
            url: "https://cdn/ep.mp4".to_string(),
            kind: Some("iframe".to_string()),
        });
        assert_eq!(forced.kind, StreamKind::Embed);
    }

    #[test]
    fn test_home_feed_section_types() {
        let raw: HomeData = serde_json::from_str(
            r#"{
                "recent": {"animeList": [{"animeId": "r"}]},
                "batch": {"animeList": [{"animeId": "b"}]},
                "movie": {"animeList": [{"animeId": "m"}]},
                "top10": {"animeList": [{"animeId": "t", "rank": 1}]}
            }"#,
        )
        .unwrap();

        let feed = to_home_feed(&raw);
        assert_eq!(feed.recent[0].kind, "TV");
        assert_eq!(feed.batch[0].kind, "Batch");
        assert_eq!(feed.movie[0].kind, "Movie");
        assert_eq!(feed.featured().map(|a| a.id.as_str()), Some("t"));
    }

    #[test]
    fn test_schedule_genres_split() {
        let raw: ScheduleData = serde_json::from_str(
            r#"{"days": [{"day": "Monday", "animeList": [
                {"animeId": "a", "title": "A", "type": "TV", "score": "7.5",
                 "estimation": "22:00", "genres": "Action, Comedy,"}
            ]}]}"#,
        )
        .unwrap();

        let schedule = to_schedule(&raw);
        let entry = &schedule.days[0].entries[0];
        assert_eq!(schedule.days[0].day, "Monday");
        assert_eq!(entry.anime.genre, vec!["Action".to_string(), "Comedy".to_string()]);
        assert_eq!(entry.anime.rating, "7.5");
        assert_eq!(entry.estimation, "22:00");
    }
}
