use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::api::{Anime, Page};

use super::poster::Posters;
use super::widgets::{anime_list_item, highlight_style, render_placeholder, titled_block};

/// Which paged catalog a listing view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Recent,
    Trending,
    Ongoing,
    Completed,
    Movies,
    Search(String),
    Genre { id: String, title: String },
}

impl Listing {
    pub fn title(&self) -> String {
        match self {
            Listing::Recent => "Recent Updates".to_string(),
            Listing::Trending => "Trending".to_string(),
            Listing::Ongoing => "Ongoing".to_string(),
            Listing::Completed => "Completed".to_string(),
            Listing::Movies => "Movies".to_string(),
            Listing::Search(query) => format!("Search: {}", query),
            Listing::Genre { title, .. } => format!("Genre: {}", title),
        }
    }
}

#[derive(Debug)]
pub struct ListingState {
    pub listing: Listing,
    pub page_number: u32,
    pub page: Option<Page<Anime>>,
    pub loading: bool,
    pub error: Option<String>,
    pub list_state: ListState,
}

impl ListingState {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            page_number: 1,
            page: None,
            loading: true,
            error: None,
            list_state: ListState::default(),
        }
    }

    pub fn items(&self) -> &[Anime] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&Anime> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn set_page(&mut self, page_number: u32, page: Page<Anime>) {
        self.page_number = page_number;
        self.loading = false;
        self.error = None;
        self.list_state
            .select(if page.items.is_empty() { None } else { Some(0) });
        self.page = Some(page);
    }

    pub fn set_failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
        self.page = None;
        self.list_state.select(None);
    }

    pub fn next_page(&self) -> Option<u32> {
        self.page.as_ref().and_then(|p| p.next_page())
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.page.as_ref().and_then(|p| p.prev_page())
    }
}

fn pagination_line(state: &ListingState, accent: Color) -> Line<'static> {
    let total = state
        .page
        .as_ref()
        .and_then(|p| p.pagination.as_ref())
        .map(|p| p.total_pages)
        .filter(|&t| t > 0);

    let mut spans = vec![Span::styled(
        match total {
            Some(total) => format!(" Page {} of {} ", state.page_number, total),
            None => format!(" Page {} ", state.page_number),
        },
        Style::default().fg(accent),
    )];

    if state.prev_page().is_some() {
        spans.push(Span::styled("[p] prev ", Style::default().fg(Color::DarkGray)));
    }
    if state.next_page().is_some() {
        spans.push(Span::styled("[n] next", Style::default().fg(Color::DarkGray)));
    }

    Line::from(spans)
}

pub fn render_listing_view(
    frame: &mut Frame,
    area: Rect,
    state: &mut ListingState,
    posters: &mut Posters,
    accent: Color,
) {
    let title = state.listing.title();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[0]);

    if state.items().is_empty() {
        let message = if state.loading {
            "Loading...".to_string()
        } else if let Some(err) = &state.error {
            err.clone()
        } else {
            "No anime found".to_string()
        };
        render_placeholder(frame, columns[0], &title, &message, accent);
    } else {
        let items: Vec<ListItem> = state.items().iter().map(anime_list_item).collect();
        let list = List::new(items)
            .block(titled_block(&title, accent))
            .highlight_style(highlight_style(accent))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, columns[0], &mut state.list_state);

        if let Some(anime) = state.selected() {
            let poster = anime.thumbnail.clone();
            posters.render(frame, columns[1], &poster, accent);
        }
    }

    frame.render_widget(Paragraph::new(pagination_line(state, accent)), rows[1]);
}
