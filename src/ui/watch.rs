use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::api::WatchEpisode;

use super::poster::Posters;
use super::widgets::{field_line, highlight_style, render_placeholder, titled_block};

/// A playable choice: the episode's default stream or one mirror server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub label: String,
    /// `None` for the default stream
    pub server_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchFocus {
    #[default]
    Sources,
    Recommended,
}

#[derive(Debug)]
pub struct WatchState {
    pub episode_id: String,
    pub episode: Option<WatchEpisode>,
    pub loading: bool,
    pub error: Option<String>,
    pub focus: WatchFocus,
    pub sources_state: ListState,
    pub recommended_state: ListState,
    /// Last playback message
    pub status: Option<String>,
}

impl WatchState {
    pub fn new(episode_id: String) -> Self {
        Self {
            episode_id,
            episode: None,
            loading: true,
            error: None,
            focus: WatchFocus::default(),
            sources_state: ListState::default(),
            recommended_state: ListState::default(),
            status: None,
        }
    }

    pub fn set_episode(&mut self, episode: WatchEpisode) {
        self.loading = false;
        self.error = None;
        self.focus = WatchFocus::Sources;
        self.recommended_state.select(if episode.recommended.is_empty() {
            None
        } else {
            Some(0)
        });
        self.episode = Some(episode);
        self.sources_state.select(Some(0));
    }

    pub fn set_failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn sources(&self) -> Vec<SourceRow> {
        let Some(episode) = &self.episode else {
            return Vec::new();
        };

        let mut rows = vec![SourceRow {
            label: format!("Default ({})", episode.stream.kind.as_display()),
            server_id: None,
        }];
        for quality in &episode.qualities {
            for server in &quality.servers {
                rows.push(SourceRow {
                    label: format!("{} · {}", quality.title, server.label),
                    server_id: Some(server.id.clone()),
                });
            }
        }
        rows
    }

    pub fn selected_source(&self) -> Option<SourceRow> {
        let idx = self.sources_state.selected()?;
        self.sources().into_iter().nth(idx)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            WatchFocus::Sources => WatchFocus::Recommended,
            WatchFocus::Recommended => WatchFocus::Sources,
        };
    }
}

fn render_header(frame: &mut Frame, area: Rect, episode: &WatchEpisode, accent: Color) {
    let neighbour = |label: &str, link: Option<&crate::api::models::EpisodeLink>| match link {
        Some(link) => Span::styled(
            format!("{} {}  ", label, link.title),
            Style::default().fg(Color::Cyan),
        ),
        None => Span::styled(
            format!("{} none  ", label),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            episode.title.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        field_line("Released", &episode.released_on),
        field_line("Stream", episode.stream.kind.as_display()),
        Line::from(vec![
            neighbour("[ prev:", episode.prev_episode.as_ref()),
            neighbour("] next:", episode.next_episode.as_ref()),
        ]),
    ];
    if !episode.genres.is_empty() {
        let genres: Vec<&str> = episode.genres.iter().map(|g| g.title.as_str()).collect();
        lines.push(field_line("Genres", &genres.join(", ")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(episode.synopsis.clone()));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block("Now Watching", accent));
    frame.render_widget(paragraph, area);
}

fn render_downloads(frame: &mut Frame, area: Rect, episode: &WatchEpisode, accent: Color) {
    let mut lines = Vec::new();
    for format in &episode.downloads {
        lines.push(Line::from(Span::styled(
            format.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for quality in &format.qualities {
            let hosts: Vec<&str> = quality.links.iter().map(|l| l.title.as_str()).collect();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", quality.title),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(hosts.join(", ")),
            ]));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No downloads",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block("Downloads", accent));
    frame.render_widget(paragraph, area);
}

pub fn render_watch_view(
    frame: &mut Frame,
    area: Rect,
    state: &mut WatchState,
    posters: &mut Posters,
    accent: Color,
) {
    let Some(episode) = state.episode.clone() else {
        let message = if state.loading {
            "Loading...".to_string()
        } else {
            match &state.error {
                Some(err) => format!("Episode not found\n\n{}", err),
                None => "Episode not found".to_string(),
            }
        };
        render_placeholder(frame, area, "Watch", &message, accent);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Percentage(25)])
        .split(rows[0]);
    render_header(frame, top[0], &episode, accent);
    posters.render(frame, top[1], &episode.poster, accent);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(rows[1]);

    let dim = |focused: bool| if focused { accent } else { Color::DarkGray };

    let sources: Vec<ListItem> = state
        .sources()
        .into_iter()
        .map(|row| ListItem::new(row.label))
        .collect();
    let sources_list = List::new(sources)
        .block(titled_block(
            "Servers",
            dim(state.focus == WatchFocus::Sources),
        ))
        .highlight_style(highlight_style(accent))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(sources_list, middle[0], &mut state.sources_state);

    let recommended: Vec<ListItem> = episode
        .recommended
        .iter()
        .map(|rec| {
            ListItem::new(Line::from(vec![
                Span::raw(rec.title.clone()),
                Span::styled(
                    format!(" {}", rec.release_date),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let recommended_list = List::new(recommended)
        .block(titled_block(
            "Recommended",
            dim(state.focus == WatchFocus::Recommended),
        ))
        .highlight_style(highlight_style(accent))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(recommended_list, middle[1], &mut state.recommended_state);

    render_downloads(frame, middle[2], &episode, accent);

    if let Some(status) = &state.status {
        frame.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow)),
            rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Quality, Server};
    use crate::api::{StreamKind, StreamSource};

    fn episode() -> WatchEpisode {
        WatchEpisode {
            id: "show-episode-2".to_string(),
            title: "Show Episode 2".to_string(),
            anime_id: "show".to_string(),
            poster: String::new(),
            released_on: "2 days ago".to_string(),
            stream: StreamSource {
                url: "https://www.blogger.com/video.g?token=x".to_string(),
                kind: StreamKind::Embed,
            },
            prev_episode: None,
            next_episode: None,
            synopsis: String::new(),
            genres: vec![],
            qualities: vec![Quality {
                title: "720p".to_string(),
                servers: vec![Server {
                    id: "srv-1".to_string(),
                    title: "Nakama 720p".to_string(),
                    label: "Nakama".to_string(),
                }],
            }],
            downloads: vec![],
            recommended: vec![],
        }
    }

    #[test]
    fn test_sources_start_with_default_stream() {
        let mut state = WatchState::new("show-episode-2".to_string());
        state.set_episode(episode());

        let sources = state.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].label, "Default (embed)");
        assert_eq!(sources[0].server_id, None);
        assert_eq!(sources[1].label, "720p · Nakama");
        assert_eq!(state.selected_source(), Some(sources[0].clone()));
        assert_eq!(state.recommended_state.selected(), None);
    }

    #[test]
    fn test_failed_episode_has_no_sources() {
        let mut state = WatchState::new("missing".to_string());
        state.set_failed("Failed to fetch episode: HTTP 404".to_string());
        assert!(state.sources().is_empty());
        assert!(!state.loading);
    }
}
