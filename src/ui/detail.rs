use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::api::{Anime, Episode};
use crate::browse::{EpisodeBrowser, page_window};

use super::poster::Posters;
use super::widgets::{
    field_line, format_episode_num, highlight_style, render_placeholder, titled_block,
};

#[derive(Debug)]
pub struct DetailState {
    pub anime_id: String,
    pub anime: Option<Anime>,
    pub loading: bool,
    pub error: Option<String>,
    pub browser: EpisodeBrowser,
    /// Typing goes to the episode filter
    pub filtering: bool,
    pub list_state: ListState,
}

impl DetailState {
    pub fn new(anime_id: String) -> Self {
        Self {
            anime_id,
            anime: None,
            loading: true,
            error: None,
            browser: EpisodeBrowser::default(),
            filtering: false,
            list_state: ListState::default(),
        }
    }

    pub fn set_anime(&mut self, anime: Anime) {
        self.loading = false;
        self.error = None;
        self.browser = EpisodeBrowser::default();
        self.anime = Some(anime);
        self.reset_selection();
    }

    pub fn set_failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn visible_episodes(&self) -> Vec<&Episode> {
        match &self.anime {
            Some(anime) => self.browser.visible(&anime.episodes),
            None => Vec::new(),
        }
    }

    pub fn selected_episode(&self) -> Option<&Episode> {
        let idx = self.list_state.selected()?;
        self.visible_episodes().get(idx).copied()
    }

    /// Select the first row of the current page, if any.
    pub fn reset_selection(&mut self) {
        let select = if self.visible_episodes().is_empty() {
            None
        } else {
            Some(0)
        };
        self.list_state.select(select);
    }

    pub fn next_page(&mut self) {
        let Some(anime) = &self.anime else {
            return;
        };
        if self.browser.next_page(&anime.episodes) {
            self.reset_selection();
        }
    }

    pub fn prev_page(&mut self) {
        if self.browser.prev_page() {
            self.reset_selection();
        }
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.browser.push_char(c);
        self.reset_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.browser.pop_char();
        self.reset_selection();
    }
}

fn render_info(frame: &mut Frame, area: Rect, anime: &Anime, accent: Color) {
    let mut lines = vec![
        Line::from(Span::styled(
            anime.title.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(japanese) = &anime.japanese {
        lines.push(Line::from(Span::styled(
            japanese.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(field_line("Type", &anime.kind));
    lines.push(field_line("Status", &anime.status));
    lines.push(field_line("Score", &anime.rating));
    lines.push(field_line("Year", &anime.year.to_string()));
    if let Some(studios) = &anime.studios {
        lines.push(field_line("Studios", studios));
    }
    if let Some(producers) = &anime.producers {
        lines.push(field_line("Producers", producers));
    }
    if !anime.genre.is_empty() {
        lines.push(field_line("Genres", &anime.genre.join(", ")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(anime.description.clone()));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block("Details", accent));
    frame.render_widget(paragraph, area);
}

fn render_filter_input(frame: &mut Frame, area: Rect, state: &DetailState, total: usize, accent: Color) {
    let shown = state
        .anime
        .as_ref()
        .map(|a| crate::browse::filter_episodes(&a.episodes, state.browser.query()).len())
        .unwrap_or(0);

    let title = if state.browser.query().is_empty() {
        format!(" Episodes ({}) ", total)
    } else {
        format!(" Episodes (Showing {}) ", shown)
    };

    let border = if state.filtering {
        accent
    } else {
        Color::DarkGray
    };

    let text = if state.browser.query().is_empty() && !state.filtering {
        Span::styled("Search episode... (/)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.browser.query().to_string())
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title)
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(input, area);
}

fn page_window_line(current: u32, total: u32, accent: Color) -> Line<'static> {
    if total <= 1 {
        return Line::default();
    }

    let mut spans = vec![Span::styled("‹ ", Style::default().fg(Color::DarkGray))];
    for page in page_window(current, total) {
        let style = if page == current {
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", page), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("›", Style::default().fg(Color::DarkGray)));

    Line::from(spans)
}

pub fn render_detail_view(
    frame: &mut Frame,
    area: Rect,
    state: &mut DetailState,
    posters: &mut Posters,
    accent: Color,
) {
    let Some(anime) = state.anime.clone() else {
        let message = if state.loading {
            "Loading...".to_string()
        } else {
            match &state.error {
                Some(err) => format!("Anime not found\n\n{}", err),
                None => "Anime not found".to_string(),
            }
        };
        render_placeholder(frame, area, "Details", &message, accent);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Percentage(30)])
        .split(rows[0]);

    render_info(frame, top[0], &anime, accent);
    posters.render(frame, top[1], &anime.thumbnail, accent);

    render_filter_input(frame, rows[1], state, anime.episodes.len(), accent);

    let visible = state.visible_episodes();
    if visible.is_empty() {
        let message = if state.browser.query().is_empty() {
            "No episodes yet".to_string()
        } else {
            format!("No episodes found matching \"{}\"", state.browser.query())
        };
        render_placeholder(frame, rows[2], "Episodes", &message, accent);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|ep| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format_episode_num(ep.number),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" - "),
                    Span::raw(ep.title.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(titled_block(&anime.title, accent))
            .highlight_style(highlight_style(accent))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, rows[2], &mut state.list_state);
    }

    let total_pages = state.browser.total_pages(&anime.episodes);
    frame.render_widget(
        Paragraph::new(page_window_line(state.browser.page(), total_pages, accent)),
        rows[3],
    );
}
