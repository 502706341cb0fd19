use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    widgets::{List, ListItem, ListState},
};

use crate::api::Genre;

use super::widgets::{highlight_style, render_placeholder, titled_block};

pub fn render_genres_view(
    frame: &mut Frame,
    area: Rect,
    genres: &[Genre],
    loading: bool,
    list_state: &mut ListState,
    accent: Color,
) {
    if genres.is_empty() {
        let message = if loading {
            "Loading..."
        } else {
            "No genres available"
        };
        render_placeholder(frame, area, "Genres", message, accent);
        return;
    }

    let items: Vec<ListItem> = genres
        .iter()
        .map(|genre| ListItem::new(genre.title.clone()))
        .collect();

    let list = List::new(items)
        .block(titled_block("Genres", accent))
        .highlight_style(highlight_style(accent))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}
