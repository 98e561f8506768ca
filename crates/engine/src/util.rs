//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and normalization logic so the store enforces consistent
//! invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Generate an identifier for which `is_taken` returns false.
pub(crate) fn new_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !is_taken(&id) {
            return id;
        }
    }
}

/// Amounts are positive decimals.
pub(crate) fn validate_amount(amount: f64, label: &str) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be > 0, got {amount}"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Fold text for search: decompose, drop combining marks, lowercase.
///
/// `"Café"` and `"CAFE"` fold to the same key.
pub(crate) fn search_key(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
