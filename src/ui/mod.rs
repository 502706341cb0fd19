pub mod detail;
pub mod genres;
pub mod home;
pub mod listing;
pub mod poster;
pub mod schedule;
pub mod search;
pub mod watch;
pub mod widgets;

pub use detail::render_detail_view;
pub use genres::render_genres_view;
pub use home::render_home_view;
pub use listing::render_listing_view;
pub use schedule::render_schedule_view;
pub use search::render_search_view;
pub use watch::render_watch_view;
