use std::collections::HashSet;
use std::sync::Arc;

use ratatui::{Frame, layout::Rect, style::Color};
use ratatui_image::{StatefulImage, picker::Picker, protocol::StatefulProtocol};

use crate::image_cache::ImageCache;

use super::widgets::render_placeholder;

/// Renders one poster at a time and records which ones still need downloading.
pub struct Posters {
    cache: Option<Arc<ImageCache>>,
    picker: Picker,
    current: Option<(String, StatefulProtocol)>,
    requested: HashSet<String>,
    failed: HashSet<String>,
    wanted: Vec<String>,
}

impl Posters {
    /// `cache` is `None` when posters are disabled.
    pub fn new(cache: Option<Arc<ImageCache>>, picker: Picker) -> Self {
        Self {
            cache,
            picker,
            current: None,
            requested: HashSet::new(),
            failed: HashSet::new(),
            wanted: Vec::new(),
        }
    }

    pub fn cache(&self) -> Option<Arc<ImageCache>> {
        self.cache.clone()
    }

    /// URLs seen during rendering that are not on disk yet.
    pub fn take_wanted(&mut self) -> Vec<String> {
        std::mem::take(&mut self.wanted)
    }

    pub fn mark_failed(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, url: &str, accent: Color) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        if url.is_empty() || area.width < 4 || area.height < 4 {
            return;
        }

        let is_current = matches!(&self.current, Some((current, _)) if current == url);
        if !is_current {
            match cache.get(url) {
                Some(img) => {
                    let protocol = self.picker.new_resize_protocol(img);
                    self.current = Some((url.to_string(), protocol));
                }
                None => {
                    let allowed = cache.is_allowed(url) && !self.failed.contains(url);
                    if allowed && self.requested.insert(url.to_string()) {
                        self.wanted.push(url.to_string());
                    }
                    let message = if allowed { "Loading…" } else { "No poster" };
                    render_placeholder(frame, area, "Poster", message, accent);
                    return;
                }
            }
        }

        if let Some((_, protocol)) = self.current.as_mut() {
            frame.render_stateful_widget(StatefulImage::default(), area, protocol);
        }
    }
}
