//! Client-side episode browsing over an already fetched episode list.

use crate::api::Episode;

pub const EPISODES_PER_PAGE: usize = 24;
const PAGE_WINDOW: u32 = 5;

/// Newest first, narrowed to episodes whose number or title contains `query`.
pub fn filter_episodes<'a>(episodes: &'a [Episode], query: &str) -> Vec<&'a Episode> {
    let query = query.trim().to_lowercase();

    episodes
        .iter()
        .rev()
        .filter(|ep| {
            query.is_empty()
                || ep.number.to_string().contains(&query)
                || ep.title.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn total_pages(count: usize) -> u32 {
    count.div_ceil(EPISODES_PER_PAGE) as u32
}

/// Items on 1-based `page`; out of range pages are empty.
pub fn page_slice<T>(items: &[T], page: u32) -> &[T] {
    let start = (page.max(1) as usize - 1) * EPISODES_PER_PAGE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + EPISODES_PER_PAGE).min(items.len());
    &items[start..end]
}

/// Up to five page numbers around `current`, shifted to stay within `1..=total`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let len = total.min(PAGE_WINDOW);
    let first = if total <= PAGE_WINDOW || current <= 3 {
        1
    } else if current >= total - 2 {
        total - (PAGE_WINDOW - 1)
    } else {
        current - 2
    };

    (first..first + len).collect()
}

/// Filter text and page for the detail view's episode list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeBrowser {
    query: String,
    page: u32,
}

impl Default for EpisodeBrowser {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
        }
    }
}

impl EpisodeBrowser {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.page = 1;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.page = 1;
    }

    pub fn visible<'a>(&self, episodes: &'a [Episode]) -> Vec<&'a Episode> {
        let filtered = filter_episodes(episodes, &self.query);
        page_slice(&filtered, self.page).to_vec()
    }

    pub fn total_pages(&self, episodes: &[Episode]) -> u32 {
        total_pages(filter_episodes(episodes, &self.query).len())
    }

    pub fn next_page(&mut self, episodes: &[Episode]) -> bool {
        if self.page < self.total_pages(episodes) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(n: u32) -> Vec<Episode> {
        (1..=n)
            .map(|number| Episode {
                id: format!("ep-{}", number),
                number,
                title: format!("Episode {}", number),
                thumbnail: String::new(),
                duration: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_filter_is_newest_first() {
        let eps = episodes(3);
        let numbers: Vec<u32> = filter_episodes(&eps, "").iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[test]
    fn test_filter_matches_number_substring() {
        let eps = episodes(25);
        let numbers: Vec<u32> = filter_episodes(&eps, "2").iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![25, 24, 23, 22, 21, 20, 12, 2]);
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let mut eps = episodes(2);
        eps[0].title = "Episode 1 - The Beginning".to_string();
        let found = filter_episodes(&eps, "BEGIN");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, 1);
    }

    #[test]
    fn test_total_pages_and_slices() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(24), 1);
        assert_eq!(total_pages(25), 2);

        let items: Vec<u32> = (0..50).collect();
        assert_eq!(page_slice(&items, 1).len(), 24);
        assert_eq!(page_slice(&items, 3), &[48, 49]);
        assert!(page_slice(&items, 4).is_empty());
    }

    #[test]
    fn test_page_window_clamps() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_query_change_resets_page() {
        let eps = episodes(60);
        let mut browser = EpisodeBrowser::default();

        assert!(browser.next_page(&eps));
        assert!(browser.next_page(&eps));
        assert!(!browser.next_page(&eps));
        assert_eq!(browser.page(), 3);

        browser.push_char('5');
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.visible(&eps).first().map(|e| e.number), Some(59));
    }
}
