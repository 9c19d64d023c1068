//! Core business entities.

mod geolocation;
mod link;
mod visit;

pub use geolocation::{CityStats, CountryStats, GeoAnalytics, GeoPoint, Geolocation};
pub use link::{Link, NewLink};
pub use visit::{NewVisit, Visit};
