//! Todo field limits and validation functions.
//!
//! The limits mirror the column widths of the `todos` table, so a value
//! that passes validation always fits the storage layer.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a todo title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a todo description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a todo title: must be non-empty and within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a todo description against the length limit.
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}
