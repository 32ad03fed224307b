use std::any::Any;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ValidationError;

/// Accept a value only if it already is an instant.
///
/// This is a type guard, not a parser: strings and numbers are rejected even
/// when they look like timestamps.
pub fn validate_timestamp<T: Any>(value: &T) -> Result<DateTime<Utc>, ValidationError> {
    let any = value as &dyn Any;
    if let Some(ts) = any.downcast_ref::<DateTime<Utc>>() {
        return Ok(*ts);
    }
    if let Some(ts) = any.downcast_ref::<DateTime<FixedOffset>>() {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Some(ts) = any.downcast_ref::<SystemTime>() {
        return Ok(DateTime::<Utc>::from(*ts));
    }
    Err(ValidationError::InvalidTimestamp {
        type_name: std::any::type_name::<T>().to_string(),
    })
}
