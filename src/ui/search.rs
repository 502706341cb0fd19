use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_search_view(frame: &mut Frame, area: Rect, query: &str, accent: Color) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(query.to_string()),
        Span::styled("▏", Style::default().fg(accent)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(" Search anime ")
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
    )
    .style(Style::default().fg(Color::White));
    frame.render_widget(input, chunks[0]);

    let hint = Paragraph::new(Span::styled(
        " Type a title and press Enter",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(hint, chunks[1]);
}
