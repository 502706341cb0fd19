use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
};

use crate::api::Anime;

/// Create a styled block with a title
pub fn titled_block(title: &str, accent: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
}

/// Create a help bar at the bottom
pub fn help_bar<'a>(hints: &'a [(&'a str, &'a str)]) -> Paragraph<'a> {
    let spans: Vec<Span> = hints
        .iter()
        .enumerate()
        .flat_map(|(i, (key, action))| {
            let mut v = vec![
                Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(*action, Style::default().fg(Color::DarkGray)),
            ];
            if i < hints.len() - 1 {
                v.push(Span::raw("  "));
            }
            v
        })
        .collect();

    Paragraph::new(Line::from(spans))
}

/// Format episode number with leading zeros
pub fn format_episode_num(num: u32) -> String {
    format!("{:02}", num)
}

/// Parse accent color from config string
pub fn parse_accent_color(color: &str) -> Color {
    match color.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => Color::Magenta, // default
    }
}

pub fn highlight_style(accent: Color) -> Style {
    Style::default()
        .bg(accent)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// One listing row: title, type badge, rating and year.
pub fn anime_list_item(anime: &Anime) -> ListItem<'static> {
    let rating_color = if anime.rating == "N/A" {
        Color::DarkGray
    } else {
        Color::Yellow
    };

    ListItem::new(Line::from(vec![
        Span::raw(anime.title.clone()),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", anime.kind),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(format!("★ {}", anime.rating), Style::default().fg(rating_color)),
        Span::styled(
            format!(" {}", anime.year),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

/// Centered placeholder for loading, empty and failed states.
pub fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: &str, accent: Color) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(titled_block(title, accent));

    frame.render_widget(paragraph, area);
}

/// Key/value line used in detail panels, e.g. `Status: Ongoing`.
pub fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.to_string()),
    ])
}
