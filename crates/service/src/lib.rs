//! Service layer providing credential registration and verification on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
#[cfg(test)]
pub mod test_support;
