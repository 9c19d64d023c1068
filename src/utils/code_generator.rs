//! Short code generation and alias validation.
//!
//! Generated codes make no uniqueness guarantee; the link store's unique
//! constraint is the arbiter and a collision surfaces as a conflict there.

use crate::error::AppError;
use serde_json::json;

/// Random bytes per code; rendered as twice as many hex characters.
const CODE_LENGTH_BYTES: usize = 3;

/// Maximum length for codes and aliases, matching the column width.
pub const MAX_CODE_LENGTH: usize = 20;

/// Generates a random short code of 6 hex characters.
///
/// Entropy comes from the operating system CSPRNG. Short codes double as
/// access tokens for the link, so a predictable generator would be a
/// security defect, not just a collision hazard.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    hex::encode(buffer)
}

/// Validates a user-provided alias.
///
/// # Rules
///
/// - Non-empty, at most 20 characters
/// - Allowed characters: letters, digits, underscores, hyphens
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Alias must be 1-20 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::bad_request(
            "Alias can only contain letters, numbers, underscores and hyphens",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
