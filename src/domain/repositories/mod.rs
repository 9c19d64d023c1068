//! Repository traits decoupling the domain from storage.

mod link_repository;
mod visit_repository;

pub use link_repository::LinkRepository;
pub use visit_repository::{DailyCount, VisitRepository, zero_filled_daily_counts};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
