use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use crate::api::{Anime, Schedule};

use super::widgets::{highlight_style, render_placeholder, titled_block};

#[derive(Debug, Default)]
pub struct ScheduleState {
    pub schedule: Option<Schedule>,
    pub loading: bool,
    pub error: Option<String>,
    pub list_state: ListState,
}

impl ScheduleState {
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.loading = false;
        self.error = None;
        self.list_state
            .select(if schedule.days.is_empty() { None } else { Some(0) });
        self.schedule = Some(schedule);
    }

    pub fn set_failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn row_count(&self) -> usize {
        self.schedule
            .as_ref()
            .map(|s| s.days.iter().map(|d| d.entries.len() + 1).sum())
            .unwrap_or(0)
    }

    /// The anime under the cursor; day headings select nothing.
    pub fn selected(&self) -> Option<&Anime> {
        let mut idx = self.list_state.selected()?;
        for day in &self.schedule.as_ref()?.days {
            if idx == 0 {
                return None;
            }
            idx -= 1;
            if idx < day.entries.len() {
                return Some(&day.entries[idx].anime);
            }
            idx -= day.entries.len();
        }
        None
    }
}

pub fn render_schedule_view(frame: &mut Frame, area: Rect, state: &mut ScheduleState, accent: Color) {
    let Some(schedule) = &state.schedule else {
        let message = if state.loading {
            "Loading..."
        } else {
            state.error.as_deref().unwrap_or("No schedule available")
        };
        render_placeholder(frame, area, "Release Schedule", message, accent);
        return;
    };

    let mut items: Vec<ListItem> = Vec::new();
    for day in &schedule.days {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("▸ {}", day.day),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))));

        for entry in &day.entries {
            items.push(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::raw(entry.anime.title.clone()),
                Span::styled(
                    format!(" {}", entry.estimation),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!(" ★ {}", entry.anime.rating),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
        }
    }

    let list = List::new(items)
        .block(titled_block("Release Schedule", accent))
        .highlight_style(highlight_style(accent))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{ScheduleDay, ScheduleEntry};

    fn entry(id: &str) -> ScheduleEntry {
        ScheduleEntry {
            anime: Anime {
                id: id.to_string(),
                title: id.to_string(),
                description: String::new(),
                thumbnail: String::new(),
                banner: String::new(),
                genre: vec![],
                rating: "N/A".to_string(),
                year: 2026,
                kind: "TV".to_string(),
                status: "Released".to_string(),
                episodes: vec![],
                japanese: None,
                producers: None,
                studios: None,
                synopsis: None,
            },
            estimation: "Update".to_string(),
        }
    }

    #[test]
    fn test_selection_skips_day_headings() {
        let mut state = ScheduleState::default();
        state.set_schedule(Schedule {
            days: vec![
                ScheduleDay {
                    day: "Monday".to_string(),
                    entries: vec![entry("a"), entry("b")],
                },
                ScheduleDay {
                    day: "Tuesday".to_string(),
                    entries: vec![entry("c")],
                },
            ],
        });

        assert_eq!(state.row_count(), 5);
        assert!(state.selected().is_none());

        state.list_state.select(Some(2));
        assert_eq!(state.selected().map(|a| a.id.as_str()), Some("b"));

        state.list_state.select(Some(4));
        assert_eq!(state.selected().map(|a| a.id.as_str()), Some("c"));
    }
}
