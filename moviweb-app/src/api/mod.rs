//! HTTP API handlers for moviweb

pub mod health;
pub mod movies;
pub mod reviews;
pub mod ui;
pub mod users;

pub use health::health_routes;
pub use movies::movie_routes;
pub use reviews::review_routes;
pub use ui::ui_routes;
pub use users::user_routes;
