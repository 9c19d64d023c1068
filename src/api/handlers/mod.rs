//! HTTP request handlers for API endpoints.

pub mod analytics;
pub mod delete_link;
pub mod health;
pub mod info;
pub mod redirect;
pub mod shorten;

pub use analytics::analytics_handler;
pub use delete_link::delete_link_handler;
pub use health::health_handler;
pub use info::info_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
