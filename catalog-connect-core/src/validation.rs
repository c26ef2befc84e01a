//! Field checks shared by every builder in the crate.

use crate::{ConnectorError, ConnectorResult};

/// Maximum length of an item name or identifier, in characters.
pub const MAX_NAME_LENGTH: usize = 1024;

/// Maximum length of an item description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 32 * 1024;

/// Unwrap a required attribute or fail naming it.
pub fn required<T>(attribute: &str, value: Option<T>) -> ConnectorResult<T> {
    value.ok_or_else(|| ConnectorError::missing(attribute))
}

/// Unwrap a required string attribute that must also be non-empty.
pub fn required_non_empty(attribute: &str, value: Option<String>) -> ConnectorResult<String> {
    let value = required(attribute, value)?;
    non_empty(attribute, &value)?;
    Ok(value)
}

/// Fail if the string is empty.
pub fn non_empty(attribute: &str, value: &str) -> ConnectorResult<()> {
    if value.is_empty() {
        return Err(ConnectorError::empty(attribute));
    }
    Ok(())
}

/// Fail if the list is empty.
pub fn non_empty_list<T>(attribute: &str, values: &[T]) -> ConnectorResult<()> {
    if values.is_empty() {
        return Err(ConnectorError::empty(attribute));
    }
    Ok(())
}

/// Fail if the string holds more than `max_length` characters.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn max_length(attribute: &str, value: &str, max_length: usize) -> ConnectorResult<()> {
    if value.chars().count() > max_length {
        return Err(ConnectorError::too_long(attribute, max_length));
    }
    Ok(())
}
