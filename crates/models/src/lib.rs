//! Persistence layer: sea-orm entities and connection management.

pub mod errors;
pub mod db;
pub mod app_user;
