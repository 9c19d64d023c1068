//! PostgreSQL repository implementations.

mod pg_link_repository;
mod pg_visit_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_visit_repository::PgVisitRepository;
