use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::ListState,
};
use ratatui_image::picker::Picker;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{
    Anime, AnimeSource, CachePolicy, Genre, HomeFeed, Page, Schedule, StreamKind, StreamSource,
    WatchEpisode,
};
use crate::config::Config;
use crate::error::Result;
use crate::image_cache::ImageCache;
use crate::player::MpvPlayer;
use crate::ui::{
    detail::DetailState,
    home::HomeState,
    listing::{Listing, ListingState},
    poster::Posters,
    render_detail_view, render_genres_view, render_home_view, render_listing_view,
    render_schedule_view, render_search_view, render_watch_view,
    schedule::ScheduleState,
    watch::{WatchFocus, WatchState},
    widgets,
};

pub type SharedSource = Arc<dyn AnimeSource + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Listing,
    Search,
    Genres,
    Detail,
    Watch,
    Schedule,
    Help,
}

pub enum AppMessage {
    HomeFeed(HomeFeed),
    HomeMovies(Vec<Anime>),
    HomeError(String),
    Listing {
        listing: Listing,
        page_number: u32,
        page: Page<Anime>,
    },
    ListingError {
        listing: Listing,
        error: String,
    },
    Genres(Vec<Genre>),
    Detail {
        anime_id: String,
        anime: Anime,
    },
    DetailError {
        anime_id: String,
        error: String,
    },
    Watch {
        episode_id: String,
        episode: WatchEpisode,
    },
    WatchError {
        episode_id: String,
        error: String,
    },
    Stream {
        episode_id: String,
        title: String,
        stream: StreamSource,
    },
    StreamError {
        episode_id: String,
        error: String,
    },
    Schedule(Schedule),
    ScheduleError(String),
    PosterReady(String),
    PosterFailed(String),
}

pub struct App {
    pub running: bool,
    pub view: View,
    pub history: Vec<View>,
    pub accent: Color,
    pub policy: CachePolicy,

    pub home: HomeState,
    pub listing: Option<ListingState>,
    pub search_query: String,
    pub genres: Vec<Genre>,
    pub genres_loading: bool,
    pub genres_state: ListState,
    pub detail: Option<DetailState>,
    pub watch: Option<WatchState>,
    pub schedule: ScheduleState,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub source: SharedSource,
    pub posters: Posters,
    pub player: MpvPlayer,
}

impl App {
    pub fn new(config: &Config, source: SharedSource, picker: Picker) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let policy = config.api.cache_policy();

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let image_cache = if config.images.enabled {
            match ImageCache::new(&config.images) {
                Ok(cache) => Some(Arc::new(cache)),
                Err(e) => {
                    error!(error = %e, "Failed to initialize image cache, posters disabled");
                    None
                }
            }
        } else {
            None
        };

        let player = MpvPlayer::new(config.player.args.clone());

        Self {
            running: true,
            view: View::Home,
            history: Vec::new(),
            accent,
            policy,

            home: HomeState::default(),
            listing: None,
            search_query: String::new(),
            genres: Vec::new(),
            genres_loading: false,
            genres_state: ListState::default(),
            detail: None,
            watch: None,
            schedule: ScheduleState::default(),

            msg_tx,
            msg_rx,

            source,
            posters: Posters::new(image_cache, picker),
            player,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.load_home(self.policy);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.spawn_poster_downloads();
            self.handle_events().await?;
            self.process_messages();
        }

        Ok(())
    }

    /// Run `fetch` on its own task and post whatever message it produces.
    fn spawn_fetch<F, Fut>(&self, fetch: F)
    where
        F: FnOnce(SharedSource) -> Fut,
        Fut: Future<Output = AppMessage> + Send + 'static,
    {
        let task = fetch(Arc::clone(&self.source));
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply_message(msg);
        }
    }

    fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::HomeFeed(feed) => {
                self.home.loading = false;
                self.home.error = None;
                self.home.feed = Some(feed);
                self.home.set_section(self.home.section);
            }
            AppMessage::HomeMovies(movies) => {
                self.home.movies = movies;
                self.home.set_section(self.home.section);
            }
            AppMessage::HomeError(err) => {
                self.home.loading = false;
                self.home.error = Some(err);
            }
            AppMessage::Listing {
                listing,
                page_number,
                page,
            } => match self.listing.as_mut() {
                Some(state) if state.listing == listing => state.set_page(page_number, page),
                _ => debug!(?listing, "Dropping stale listing page"),
            },
            AppMessage::ListingError { listing, error } => {
                if let Some(state) = self.listing.as_mut().filter(|s| s.listing == listing) {
                    state.set_failed(error);
                }
            }
            AppMessage::Genres(genres) => {
                self.genres_loading = false;
                self.genres = genres;
                self.genres_state
                    .select(if self.genres.is_empty() { None } else { Some(0) });
            }
            AppMessage::Detail { anime_id, anime } => {
                match self.detail.as_mut().filter(|d| d.anime_id == anime_id) {
                    Some(state) => state.set_anime(anime),
                    None => debug!(anime_id, "Dropping stale anime detail"),
                }
            }
            AppMessage::DetailError { anime_id, error } => {
                if let Some(state) = self.detail.as_mut().filter(|d| d.anime_id == anime_id) {
                    state.set_failed(error);
                }
            }
            AppMessage::Watch {
                episode_id,
                episode,
            } => match self.watch.as_mut().filter(|w| w.episode_id == episode_id) {
                Some(state) => state.set_episode(episode),
                None => debug!(episode_id, "Dropping stale episode"),
            },
            AppMessage::WatchError { episode_id, error } => {
                if let Some(state) = self.watch.as_mut().filter(|w| w.episode_id == episode_id) {
                    state.set_failed(error);
                }
            }
            AppMessage::Stream {
                episode_id,
                title,
                stream,
            } => {
                if self.is_watching(&episode_id) {
                    self.play(&title, &stream);
                } else {
                    debug!(episode_id, "Dropping stale stream");
                }
            }
            AppMessage::StreamError { episode_id, error } => {
                warn!(episode_id, error = %error, "Server lookup failed");
                if self.is_watching(&episode_id) {
                    self.set_watch_status(format!("Server unavailable: {}", error));
                }
            }
            AppMessage::Schedule(schedule) => self.schedule.set_schedule(schedule),
            AppMessage::ScheduleError(err) => self.schedule.set_failed(err),
            AppMessage::PosterReady(url) => debug!(url, "Poster cached"),
            AppMessage::PosterFailed(url) => self.posters.mark_failed(&url),
        }
    }

    fn spawn_poster_downloads(&mut self) {
        let Some(cache) = self.posters.cache() else {
            return;
        };

        for url in self.posters.take_wanted() {
            let cache = Arc::clone(&cache);
            let tx = self.msg_tx.clone();
            tokio::spawn(async move {
                match cache.download(&url).await {
                    Ok(()) => {
                        let _ = tx.send(AppMessage::PosterReady(url));
                    }
                    Err(e) => {
                        debug!(url, error = %e, "Poster download failed");
                        let _ = tx.send(AppMessage::PosterFailed(url));
                    }
                }
            });
        }
    }

    // Navigation

    fn navigate(&mut self, view: View) {
        if self.view != view {
            self.history.push(self.view);
            self.view = view;
        }
    }

    fn go_back(&mut self) {
        if let Some(view) = self.history.pop() {
            self.view = view;
        }
    }

    fn toggle_help(&mut self) {
        if self.view == View::Help {
            self.go_back();
        } else {
            self.navigate(View::Help);
        }
    }

    // Fetches

    fn load_home(&mut self, policy: CachePolicy) {
        self.home.loading = true;

        self.spawn_fetch(move |source| async move {
            match source.home(policy).await {
                Ok(feed) => AppMessage::HomeFeed(feed),
                Err(e) => AppMessage::HomeError(e.to_string()),
            }
        });

        self.spawn_fetch(move |source| async move {
            match source.movies(1, policy).await {
                Ok(page) => AppMessage::HomeMovies(page.items),
                Err(e) => {
                    warn!(error = %e, "Movie shelf unavailable");
                    AppMessage::HomeMovies(Vec::new())
                }
            }
        });
    }

    fn open_listing(&mut self, listing: Listing) {
        info!(?listing, "Opening listing");
        self.listing = Some(ListingState::new(listing));
        self.navigate(View::Listing);
        self.fetch_listing(1, self.policy);
    }

    fn fetch_listing(&mut self, page_number: u32, policy: CachePolicy) {
        let Some(state) = self.listing.as_mut() else {
            return;
        };
        state.loading = true;
        let listing = state.listing.clone();

        self.spawn_fetch(move |source| async move {
            let result = match &listing {
                Listing::Recent => source.recent(page_number, policy).await,
                Listing::Trending => source.popular(policy).await.map(|items| Page {
                    items,
                    pagination: None,
                }),
                Listing::Ongoing => source.ongoing(page_number, policy).await,
                Listing::Completed => source.completed(page_number, policy).await,
                Listing::Movies => source.movies(page_number, policy).await,
                Listing::Search(query) => source.search(query, page_number, policy).await,
                Listing::Genre { id, .. } => source.anime_by_genre(id, page_number, policy).await,
            };

            match result {
                Ok(page) => AppMessage::Listing {
                    listing,
                    page_number,
                    page,
                },
                Err(e) => AppMessage::ListingError {
                    listing,
                    error: e.to_string(),
                },
            }
        });
    }

    fn open_genres(&mut self) {
        self.navigate(View::Genres);
        if self.genres.is_empty() {
            self.fetch_genres(self.policy);
        }
    }

    fn fetch_genres(&mut self, policy: CachePolicy) {
        self.genres_loading = true;
        self.spawn_fetch(move |source| async move { AppMessage::Genres(source.genres(policy).await) });
    }

    fn open_detail(&mut self, anime_id: String) {
        info!(anime_id, "Opening anime");
        self.detail = Some(DetailState::new(anime_id));
        self.navigate(View::Detail);
        self.fetch_detail(self.policy);
    }

    fn fetch_detail(&mut self, policy: CachePolicy) {
        let Some(state) = self.detail.as_mut() else {
            return;
        };
        state.loading = true;
        let anime_id = state.anime_id.clone();

        self.spawn_fetch(move |source| async move {
            match source.anime_detail(&anime_id, policy).await {
                Ok(anime) => AppMessage::Detail { anime_id, anime },
                Err(e) => AppMessage::DetailError {
                    anime_id,
                    error: e.to_string(),
                },
            }
        });
    }

    fn open_watch(&mut self, episode_id: String) {
        info!(episode_id, "Opening episode");
        self.watch = Some(WatchState::new(episode_id));
        self.navigate(View::Watch);
        self.fetch_watch(self.policy);
    }

    fn fetch_watch(&mut self, policy: CachePolicy) {
        let Some(state) = self.watch.as_mut() else {
            return;
        };
        state.loading = true;
        let episode_id = state.episode_id.clone();

        self.spawn_fetch(move |source| async move {
            match source.episode(&episode_id, policy).await {
                Ok(episode) => AppMessage::Watch {
                    episode_id,
                    episode,
                },
                Err(e) => AppMessage::WatchError {
                    episode_id,
                    error: e.to_string(),
                },
            }
        });
    }

    fn open_schedule(&mut self) {
        self.navigate(View::Schedule);
        if self.schedule.schedule.is_none() {
            self.fetch_schedule(self.policy);
        }
    }

    fn fetch_schedule(&mut self, policy: CachePolicy) {
        self.schedule.loading = true;
        self.spawn_fetch(move |source| async move {
            match source.schedule(policy).await {
                Ok(schedule) => AppMessage::Schedule(schedule),
                Err(e) => AppMessage::ScheduleError(e.to_string()),
            }
        });
    }

    /// Re-fetch the current view, bypassing the response cache.
    fn refresh(&mut self) {
        let policy = CachePolicy::NoStore;
        match self.view {
            View::Home => self.load_home(policy),
            View::Listing => {
                let page = self.listing.as_ref().map(|l| l.page_number).unwrap_or(1);
                self.fetch_listing(page, policy);
            }
            View::Genres => self.fetch_genres(policy),
            View::Detail => self.fetch_detail(policy),
            View::Watch => self.fetch_watch(policy),
            View::Schedule => self.fetch_schedule(policy),
            View::Search | View::Help => {}
        }
    }

    // Playback

    /// Is the watch view, or help on top of it, showing `episode_id`?
    fn is_watching(&self, episode_id: &str) -> bool {
        let on_watch = match self.view {
            View::Watch => true,
            View::Help => self.history.last() == Some(&View::Watch),
            _ => false,
        };
        on_watch && self.watch.as_ref().is_some_and(|w| w.episode_id == episode_id)
    }

    fn set_watch_status(&mut self, status: String) {
        if let Some(watch) = self.watch.as_mut() {
            watch.status = Some(status);
        }
    }

    fn play(&mut self, title: &str, stream: &StreamSource) {
        if self.player.is_running() {
            info!("Replacing current playback");
        }

        let status = match self.player.play(stream, title) {
            Ok(()) if stream.kind == StreamKind::Embed => {
                "Opened embed page in mpv; it may not resolve without yt-dlp".to_string()
            }
            Ok(()) => format!("Playing {}", title),
            Err(e) => {
                error!(error = %e, "Playback failed");
                e.to_string()
            }
        };
        self.set_watch_status(status);
    }

    fn play_selected_source(&mut self) {
        let Some(watch) = self.watch.as_ref() else {
            return;
        };
        let Some(episode) = watch.episode.as_ref() else {
            return;
        };
        let Some(row) = watch.selected_source() else {
            return;
        };

        let episode_id = watch.episode_id.clone();
        let title = episode.title.clone();
        match row.server_id {
            None => {
                let stream = episode.stream.clone();
                self.play(&title, &stream);
            }
            Some(server_id) => {
                let policy = self.policy;
                self.set_watch_status(format!("Resolving {}...", row.label));
                self.spawn_fetch(move |source| async move {
                    match source.server(&server_id, policy).await {
                        Ok(stream) => AppMessage::Stream {
                            episode_id,
                            title,
                            stream,
                        },
                        Err(e) => AppMessage::StreamError {
                            episode_id,
                            error: e.to_string(),
                        },
                    }
                });
            }
        }
    }

    // Rendering

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let help_area = chunks[1];

        if self.view == View::Help {
            let underneath = self.history.last().copied().unwrap_or(View::Home);
            self.render_view(frame, main_area, underneath);
            self.render_help(frame);
        } else {
            self.render_view(frame, main_area, self.view);
        }

        let help = widgets::help_bar(help_hints(self.view));
        frame.render_widget(help, help_area);
    }

    fn render_view(&mut self, frame: &mut Frame, area: Rect, view: View) {
        match view {
            View::Home => {
                render_home_view(frame, area, &mut self.home, &mut self.posters, self.accent)
            }
            View::Listing => {
                if let Some(state) = self.listing.as_mut() {
                    render_listing_view(frame, area, state, &mut self.posters, self.accent);
                }
            }
            View::Search => render_search_view(frame, area, &self.search_query, self.accent),
            View::Genres => render_genres_view(
                frame,
                area,
                &self.genres,
                self.genres_loading,
                &mut self.genres_state,
                self.accent,
            ),
            View::Detail => {
                if let Some(state) = self.detail.as_mut() {
                    render_detail_view(frame, area, state, &mut self.posters, self.accent);
                }
            }
            View::Watch => {
                if let Some(state) = self.watch.as_mut() {
                    render_watch_view(frame, area, state, &mut self.posters, self.accent);
                }
            }
            View::Schedule => render_schedule_view(frame, area, &mut self.schedule, self.accent),
            View::Help => {}
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        use ratatui::style::{Modifier, Style};
        use ratatui::widgets::{Block, Borders, Clear, Row, Table};

        let area = frame.area();
        let dialog_area = Rect {
            x: area.width.saturating_sub(70) / 2,
            y: area.height.saturating_sub(30) / 2,
            width: area.width.min(70),
            height: area.height.min(30),
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let rows = vec![
            Row::new(vec!["Global", "?", "Toggle Help"]),
            Row::new(vec!["", "/", "Search"]),
            Row::new(vec!["", "g", "Genres"]),
            Row::new(vec!["", "s", "Release Schedule"]),
            Row::new(vec!["", "R", "Reload (skip cache)"]),
            Row::new(vec!["", "Esc", "Back"]),
            Row::new(vec!["Home", "Tab", "Next Section"]),
            Row::new(vec!["", "r/t/o/c/m", "Recent/Trending/Ongoing/Completed/Movies"]),
            Row::new(vec!["", "q", "Quit"]),
            Row::new(vec!["Lists", "j/k", "Navigate"]),
            Row::new(vec!["", "Enter", "Open"]),
            Row::new(vec!["", "n/p", "Next/Previous Page"]),
            Row::new(vec!["Anime", "/", "Filter Episodes"]),
            Row::new(vec!["", "Enter", "Watch Episode"]),
            Row::new(vec!["Watch", "Enter", "Play Server"]),
            Row::new(vec!["", "Tab", "Servers/Recommended"]),
            Row::new(vec!["", "[ / ]", "Previous/Next Episode"]),
            Row::new(vec!["", "a", "Anime Details"]),
        ];

        let table = Table::new(
            rows,
            &[
                Constraint::Percentage(15),
                Constraint::Percentage(20),
                Constraint::Percentage(65),
            ],
        )
        .header(
            Row::new(vec!["Context", "Key", "Action"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(self.accent),
            ),
        )
        .block(Block::default().borders(Borders::NONE));

        frame.render_widget(table, inner);
    }

    // Input

    async fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        // Text entry swallows every other key
        if self.view == View::Search {
            self.handle_search_input(key.code);
            return;
        }
        if self.view == View::Detail && self.detail.as_ref().is_some_and(|d| d.filtering) {
            self.handle_filter_input(key.code);
            return;
        }

        if self.view == View::Help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.toggle_help();
            }
            return;
        }

        if self.handle_global_input(key.code) {
            return;
        }

        match self.view {
            View::Home => self.handle_home_input(key.code),
            View::Listing => self.handle_listing_input(key.code),
            View::Genres => self.handle_genres_input(key.code),
            View::Detail => self.handle_detail_input(key.code),
            View::Watch => self.handle_watch_input(key.code),
            View::Schedule => self.handle_schedule_input(key.code),
            View::Search | View::Help => {}
        }
    }

    /// Keys that mean the same thing on every browsing view.
    fn handle_global_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('/') if self.view != View::Detail => {
                self.search_query.clear();
                self.navigate(View::Search);
            }
            KeyCode::Char('g') => self.open_genres(),
            KeyCode::Char('s') => self.open_schedule(),
            KeyCode::Char('R') => self.refresh(),
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('q') if self.view != View::Home => self.go_back(),
            _ => return false,
        }
        true
    }

    fn handle_home_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.home.items().len();
                select_next(&mut self.home.list_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.home.items().len();
                select_prev(&mut self.home.list_state, len);
            }
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                self.home.set_section(self.home.section.next())
            }
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
                self.home.set_section(self.home.section.prev())
            }
            KeyCode::Enter => {
                if let Some(anime) = self.home.selected() {
                    let id = anime.id.clone();
                    self.open_detail(id);
                }
            }
            KeyCode::Char('r') => self.open_listing(Listing::Recent),
            KeyCode::Char('t') => self.open_listing(Listing::Trending),
            KeyCode::Char('o') => self.open_listing(Listing::Ongoing),
            KeyCode::Char('c') => self.open_listing(Listing::Completed),
            KeyCode::Char('m') => self.open_listing(Listing::Movies),
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => {
                let query = self.search_query.trim().to_string();
                if !query.is_empty() {
                    self.open_listing(Listing::Search(query));
                }
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => self.search_query.push(c),
            _ => {}
        }
    }

    fn handle_listing_input(&mut self, key: KeyCode) {
        let Some(state) = self.listing.as_mut() else {
            return;
        };

        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = state.items().len();
                select_next(&mut state.list_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = state.items().len();
                select_prev(&mut state.list_state, len);
            }
            KeyCode::Char('n') => {
                if let Some(page) = state.next_page().filter(|_| !state.loading) {
                    self.fetch_listing(page, self.policy);
                }
            }
            KeyCode::Char('p') => {
                if let Some(page) = state.prev_page().filter(|_| !state.loading) {
                    self.fetch_listing(page, self.policy);
                }
            }
            KeyCode::Enter => {
                if let Some(anime) = state.selected() {
                    let id = anime.id.clone();
                    self.open_detail(id);
                }
            }
            _ => {}
        }
    }

    fn handle_genres_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                select_next(&mut self.genres_state, self.genres.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                select_prev(&mut self.genres_state, self.genres.len())
            }
            KeyCode::Enter => {
                let genre = self
                    .genres_state
                    .selected()
                    .and_then(|i| self.genres.get(i))
                    .cloned();
                if let Some(genre) = genre {
                    self.open_listing(Listing::Genre {
                        id: genre.id,
                        title: genre.title,
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_filter_input(&mut self, key: KeyCode) {
        let Some(state) = self.detail.as_mut() else {
            return;
        };

        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Up => state.filtering = false,
            KeyCode::Backspace => state.pop_filter_char(),
            KeyCode::Char(c) => state.push_filter_char(c),
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyCode) {
        let Some(state) = self.detail.as_mut() else {
            return;
        };

        match key {
            KeyCode::Char('/') => state.filtering = true,
            KeyCode::Char('j') | KeyCode::Down => {
                let len = state.visible_episodes().len();
                select_next(&mut state.list_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = state.visible_episodes().len();
                select_prev(&mut state.list_state, len);
            }
            KeyCode::Char('n') | KeyCode::Right => state.next_page(),
            KeyCode::Char('p') | KeyCode::Left => state.prev_page(),
            KeyCode::Enter => {
                if let Some(episode) = state.selected_episode() {
                    let id = episode.id.clone();
                    self.open_watch(id);
                }
            }
            _ => {}
        }
    }

    fn handle_watch_input(&mut self, key: KeyCode) {
        let Some(state) = self.watch.as_mut() else {
            return;
        };

        match key {
            KeyCode::Tab => state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => match state.focus {
                WatchFocus::Sources => {
                    let len = state.sources().len();
                    select_next(&mut state.sources_state, len);
                }
                WatchFocus::Recommended => {
                    let len = state.episode.as_ref().map_or(0, |e| e.recommended.len());
                    select_next(&mut state.recommended_state, len);
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match state.focus {
                WatchFocus::Sources => {
                    let len = state.sources().len();
                    select_prev(&mut state.sources_state, len);
                }
                WatchFocus::Recommended => {
                    let len = state.episode.as_ref().map_or(0, |e| e.recommended.len());
                    select_prev(&mut state.recommended_state, len);
                }
            },
            KeyCode::Enter => match state.focus {
                WatchFocus::Sources => self.play_selected_source(),
                WatchFocus::Recommended => {
                    let id = state.episode.as_ref().and_then(|e| {
                        state
                            .recommended_state
                            .selected()
                            .and_then(|i| e.recommended.get(i))
                            .map(|r| r.id.clone())
                    });
                    if let Some(id) = id {
                        self.open_watch(id);
                    }
                }
            },
            KeyCode::Char('[') => {
                let prev = state
                    .episode
                    .as_ref()
                    .and_then(|e| e.prev_episode.as_ref())
                    .map(|l| l.id.clone());
                if let Some(id) = prev {
                    self.open_watch(id);
                }
            }
            KeyCode::Char(']') => {
                let next = state
                    .episode
                    .as_ref()
                    .and_then(|e| e.next_episode.as_ref())
                    .map(|l| l.id.clone());
                if let Some(id) = next {
                    self.open_watch(id);
                }
            }
            KeyCode::Char('a') => {
                let anime_id = state
                    .episode
                    .as_ref()
                    .map(|e| e.anime_id.clone())
                    .filter(|id| !id.is_empty());
                if let Some(id) = anime_id {
                    self.open_detail(id);
                }
            }
            _ => {}
        }
    }

    fn handle_schedule_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.schedule.row_count();
                select_next(&mut self.schedule.list_state, len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.schedule.row_count();
                select_prev(&mut self.schedule.list_state, len);
            }
            KeyCode::Enter => {
                if let Some(anime) = self.schedule.selected() {
                    let id = anime.id.clone();
                    self.open_detail(id);
                }
            }
            _ => {}
        }
    }
}

fn help_hints(view: View) -> &'static [(&'static str, &'static str)] {
    match view {
        View::Home => &[
            ("Tab", "section"),
            ("Enter", "open"),
            ("/", "search"),
            ("g", "genres"),
            ("s", "schedule"),
            ("?", "help"),
            ("q", "quit"),
        ],
        View::Listing => &[
            ("Enter", "open"),
            ("n/p", "page"),
            ("?", "help"),
            ("Esc", "back"),
        ],
        View::Search => &[("Enter", "search"), ("Esc", "back")],
        View::Genres | View::Schedule => &[("Enter", "open"), ("?", "help"), ("Esc", "back")],
        View::Detail => &[
            ("Enter", "watch"),
            ("/", "filter"),
            ("n/p", "page"),
            ("?", "help"),
            ("Esc", "back"),
        ],
        View::Watch => &[
            ("Enter", "play"),
            ("Tab", "focus"),
            ("[ ]", "prev/next"),
            ("a", "anime"),
            ("Esc", "back"),
        ],
        View::Help => &[("Esc", "close")],
    }
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let next = match state.selected() {
        Some(i) => (i + 1).min(len - 1),
        None => 0,
    };
    state.select(Some(next));
}

fn select_prev(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let prev = match state.selected() {
        Some(0) | None => len - 1,
        Some(i) => i - 1,
    };
    state.select(Some(prev));
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{EpisodeLink, Quality, Server};
    use crate::api::{Episode, Pagination};
    use crate::error::Error;

    struct FakeSource;

    fn anime(id: &str) -> Anime {
        Anime {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            thumbnail: String::new(),
            banner: String::new(),
            genre: vec![],
            rating: "N/A".to_string(),
            year: 2026,
            kind: "TV".to_string(),
            status: "Released".to_string(),
            episodes: vec![Episode {
                id: format!("{}-episode-1", id),
                number: 1,
                title: "Episode 1".to_string(),
                thumbnail: String::new(),
                duration: String::new(),
            }],
            japanese: None,
            producers: None,
            studios: None,
            synopsis: None,
        }
    }

    fn listing_page(page: u32) -> Page<Anime> {
        Page {
            items: vec![anime(&format!("p{}", page))],
            pagination: Some(Pagination {
                current_page: page,
                has_next_page: true,
                next_page: Some(page + 1),
                total_pages: 5,
                ..Pagination::default()
            }),
        }
    }

    #[async_trait::async_trait]
    impl AnimeSource for FakeSource {
        async fn home(&self, _: CachePolicy) -> Result<HomeFeed> {
            Ok(HomeFeed {
                top10: vec![anime("top")],
                ..HomeFeed::default()
            })
        }
        async fn server(&self, _: &str, _: CachePolicy) -> Result<StreamSource> {
            Err(Error::fetch("server", "HTTP 404 Not Found"))
        }
        async fn episode(&self, episode_id: &str, _: CachePolicy) -> Result<WatchEpisode> {
            Ok(WatchEpisode {
                id: episode_id.to_string(),
                title: "Episode".to_string(),
                anime_id: "show".to_string(),
                poster: String::new(),
                released_on: String::new(),
                stream: StreamSource {
                    url: "https://cdn.example/a.mp4".to_string(),
                    kind: StreamKind::Direct,
                },
                prev_episode: None,
                next_episode: Some(EpisodeLink {
                    id: "show-episode-2".to_string(),
                    title: "Episode 2".to_string(),
                }),
                synopsis: String::new(),
                genres: vec![],
                qualities: vec![Quality {
                    title: "480p".to_string(),
                    servers: vec![Server {
                        id: "srv".to_string(),
                        title: "Mirror 480p".to_string(),
                        label: "Mirror".to_string(),
                    }],
                }],
                downloads: vec![],
                recommended: vec![],
            })
        }
        async fn genres(&self, _: CachePolicy) -> Vec<Genre> {
            vec![Genre {
                id: "action".to_string(),
                title: "Action".to_string(),
            }]
        }
        async fn anime_by_genre(&self, _: &str, page: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Ok(listing_page(page))
        }
        async fn anime_detail(&self, anime_id: &str, _: CachePolicy) -> Result<Anime> {
            if anime_id == "missing" {
                return Err(Error::fetch("anime detail", "HTTP 404 Not Found"));
            }
            Ok(anime(anime_id))
        }
        async fn search(&self, _: &str, page: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Ok(listing_page(page))
        }
        async fn recent(&self, page: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Ok(listing_page(page))
        }
        async fn movies(&self, page: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Ok(listing_page(page))
        }
        async fn popular(&self, _: CachePolicy) -> Result<Vec<Anime>> {
            Ok(vec![anime("hot")])
        }
        async fn ongoing(&self, page: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Ok(listing_page(page))
        }
        async fn schedule(&self, _: CachePolicy) -> Result<Schedule> {
            Ok(Schedule::default())
        }
        async fn completed(&self, _: u32, _: CachePolicy) -> Result<Page<Anime>> {
            Err(Error::fetch("completed", "HTTP 500 Internal Server Error"))
        }
    }

    fn test_app() -> App {
        let mut config = Config::default();
        config.images.enabled = false;
        App::new(&config, Arc::new(FakeSource), Picker::halfblocks())
    }

    /// Wait for one spawned fetch to report back, then apply it.
    async fn pump(app: &mut App) {
        let msg = app.msg_rx.recv().await.unwrap();
        app.apply_message(msg);
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_home_loads_feed_and_movies() {
        let mut app = test_app();
        app.load_home(CachePolicy::NoStore);
        pump(&mut app).await;
        pump(&mut app).await;

        assert!(!app.home.loading);
        assert_eq!(
            app.home.feed.as_ref().and_then(|f| f.featured()).map(|a| a.id.as_str()),
            Some("top")
        );
        assert_eq!(app.home.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_search_then_page_forward() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.view, View::Search);

        for c in "naruto".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Listing);
        pump(&mut app).await;

        press(&mut app, KeyCode::Char('n'));
        pump(&mut app).await;

        let listing = app.listing.as_ref().unwrap();
        assert_eq!(listing.listing, Listing::Search("naruto".to_string()));
        assert_eq!(listing.page_number, 2);
        assert_eq!(listing.selected().map(|a| a.id.as_str()), Some("p2"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Search);
    }

    #[tokio::test]
    async fn test_failed_listing_shows_empty_state() {
        let mut app = test_app();
        app.open_listing(Listing::Completed);
        pump(&mut app).await;

        let listing = app.listing.as_ref().unwrap();
        assert!(listing.items().is_empty());
        assert!(listing.error.as_deref().unwrap().contains("completed"));
    }

    #[tokio::test]
    async fn test_missing_anime_shows_not_found() {
        let mut app = test_app();
        app.open_detail("missing".to_string());
        pump(&mut app).await;

        let detail = app.detail.as_ref().unwrap();
        assert!(detail.anime.is_none());
        assert!(!detail.loading);
        assert!(detail.error.is_some());
    }

    #[tokio::test]
    async fn test_stale_detail_is_dropped() {
        let mut app = test_app();
        app.open_detail("first".to_string());
        app.detail = Some(DetailState::new("second".to_string()));
        pump(&mut app).await;

        assert!(app.detail.as_ref().unwrap().anime.is_none());
    }

    #[tokio::test]
    async fn test_detail_to_watch_and_next_episode() {
        let mut app = test_app();
        app.open_detail("show".to_string());
        pump(&mut app).await;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Watch);
        pump(&mut app).await;
        assert_eq!(app.watch.as_ref().unwrap().episode_id, "show-episode-1");

        press(&mut app, KeyCode::Char(']'));
        pump(&mut app).await;
        assert_eq!(app.watch.as_ref().unwrap().episode_id, "show-episode-2");
        assert_eq!(app.history, vec![View::Home, View::Detail]);
    }

    #[tokio::test]
    async fn test_server_failure_sets_status() {
        let mut app = test_app();
        app.open_watch("show-episode-1".to_string());
        pump(&mut app).await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        pump(&mut app).await;

        let status = app.watch.as_ref().unwrap().status.clone().unwrap();
        assert!(status.starts_with("Server unavailable"));
    }

    #[tokio::test]
    async fn test_stream_after_leaving_watch_is_dropped() {
        let mut app = test_app();
        app.open_watch("show-episode-1".to_string());
        pump(&mut app).await;

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Home);

        app.apply_message(AppMessage::Stream {
            episode_id: "show-episode-1".to_string(),
            title: "Episode".to_string(),
            stream: StreamSource {
                url: "https://cdn.example/a.mp4".to_string(),
                kind: StreamKind::Direct,
            },
        });
        app.apply_message(AppMessage::StreamError {
            episode_id: "show-episode-1".to_string(),
            error: "HTTP 404 Not Found".to_string(),
        });

        assert!(!app.player.is_running());
        assert!(app.watch.as_ref().unwrap().status.is_none());
    }

    #[tokio::test]
    async fn test_genre_opens_listing() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('g'));
        pump(&mut app).await;
        assert_eq!(app.genres.len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.listing.as_ref().map(|l| l.listing.clone()),
            Some(Listing::Genre {
                id: "action".to_string(),
                title: "Action".to_string()
            })
        );
    }

    #[test]
    fn test_selection_helpers() {
        let mut state = ListState::default();
        select_next(&mut state, 2);
        assert_eq!(state.selected(), Some(0));
        select_next(&mut state, 2);
        select_next(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
        select_prev(&mut state, 2);
        select_prev(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
    }
}
