//! Shape checks for transaction calls.
//!
//! - `to`: `0x` followed by exactly 40 hex digits
//! - `data`: optional `0x` followed by any number of hex digits

use alloy::primitives::Address;

use crate::session::types::{Call, CallField, SessionError, SessionResult};

pub fn is_valid_address(to: &str) -> bool {
    match to.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn is_valid_data(data: &str) -> bool {
    let hex = data.strip_prefix("0x").unwrap_or(data);
    hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validate every call in order, stopping at the first bad field.
///
/// Returns the parsed target addresses on success.
pub fn validate_calls(calls: &[Call]) -> SessionResult<Vec<Address>> {
    if calls.is_empty() {
        return Err(SessionError::EmptyCalls);
    }

    let mut targets = Vec::with_capacity(calls.len());
    for (index, call) in calls.iter().enumerate() {
        if !is_valid_address(&call.to) {
            return Err(SessionError::InvalidCall {
                index,
                field: CallField::To,
                value: call.to.clone(),
            });
        }
        if !is_valid_data(&call.data) {
            return Err(SessionError::InvalidCall {
                index,
                field: CallField::Data,
                value: call.data.clone(),
            });
        }
        let target = call.to.parse::<Address>().map_err(|_| SessionError::InvalidCall {
            index,
            field: CallField::To,
            value: call.to.clone(),
        })?;
        targets.push(target);
    }
    Ok(targets)
}
