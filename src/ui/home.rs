use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::api::{Anime, HomeFeed};

use super::poster::Posters;
use super::widgets::{anime_list_item, highlight_style, render_placeholder, titled_block};

/// Rows shown from the recent feed on the home screen
pub const RECENT_ON_HOME: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeSection {
    #[default]
    Recent,
    Top10,
    Movies,
    Batch,
}

impl HomeSection {
    pub const ALL: [HomeSection; 4] = [
        HomeSection::Recent,
        HomeSection::Top10,
        HomeSection::Movies,
        HomeSection::Batch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeSection::Recent => "Recent Updates",
            HomeSection::Top10 => "Top 10",
            HomeSection::Movies => "Movies",
            HomeSection::Batch => "Batch",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Home screen state. The feed and the movie shelf arrive separately.
#[derive(Debug, Default)]
pub struct HomeState {
    pub feed: Option<HomeFeed>,
    pub movies: Vec<Anime>,
    pub loading: bool,
    pub error: Option<String>,
    pub section: HomeSection,
    pub list_state: ListState,
}

impl HomeState {
    pub fn items(&self) -> &[Anime] {
        let Some(feed) = &self.feed else {
            return match self.section {
                HomeSection::Movies => &self.movies,
                _ => &[],
            };
        };

        match self.section {
            HomeSection::Recent => &feed.recent[..feed.recent.len().min(RECENT_ON_HOME)],
            HomeSection::Top10 => &feed.top10,
            HomeSection::Movies => &self.movies,
            HomeSection::Batch => &feed.batch,
        }
    }

    pub fn selected(&self) -> Option<&Anime> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn set_section(&mut self, section: HomeSection) {
        self.section = section;
        let select = if self.items().is_empty() { None } else { Some(0) };
        self.list_state.select(select);
    }
}

fn render_featured(frame: &mut Frame, area: Rect, featured: Option<&Anime>, accent: Color) {
    let lines = match featured {
        Some(anime) => vec![
            Line::from(vec![
                Span::styled(
                    " FEATURED ",
                    Style::default()
                        .bg(accent)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    anime.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("{} · ★ {} · {}", anime.kind, anime.rating, anime.year),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![Line::from("Nothing featured right now")],
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled_block("nonton", accent));
    frame.render_widget(paragraph, area);
}

pub fn render_home_view(
    frame: &mut Frame,
    area: Rect,
    state: &mut HomeState,
    posters: &mut Posters,
    accent: Color,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    render_featured(
        frame,
        rows[0],
        state.feed.as_ref().and_then(|f| f.featured()),
        accent,
    );

    let tabs = Tabs::new(HomeSection::ALL.iter().map(|s| s.as_str()))
        .select(state.section.index())
        .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[2]);

    let title = state.section.as_str();
    if state.items().is_empty() {
        let message = if state.loading {
            "Loading..."
        } else if let Some(err) = &state.error {
            err.as_str()
        } else {
            "Nothing here yet"
        };
        render_placeholder(frame, columns[0], title, message, accent);
        return;
    }

    let items: Vec<ListItem> = state.items().iter().map(anime_list_item).collect();
    let list = List::new(items)
        .block(titled_block(title, accent))
        .highlight_style(highlight_style(accent))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, columns[0], &mut state.list_state);

    if let Some(anime) = state.selected() {
        let poster = anime.thumbnail.clone();
        posters.render(frame, columns[1], &poster, accent);
    }
}
