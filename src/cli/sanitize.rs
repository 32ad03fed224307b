use std::io::Read;
use std::path::Path;

use crate::config::Settings;
use crate::context::ContextValue;
use crate::error::Result;
use crate::guard::LogGuard;
use crate::sanitize::MaskToken;

/// Read JSON from `input` (stdin when `None`) and print the sanitized form.
pub fn run(settings: &Settings, input: Option<&Path>, mask: Option<&str>, pretty: bool) -> Result<bool> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let guard = LogGuard::from_settings(settings)?;
    let sanitized = sanitize_value(&guard, &value.into(), mask)?;

    let out = if pretty {
        serde_json::to_string_pretty(&sanitized)?
    } else {
        serde_json::to_string(&sanitized)?
    };
    println!("{out}");
    Ok(true)
}

fn sanitize_value(guard: &LogGuard, value: &ContextValue, mask: Option<&str>) -> Result<ContextValue> {
    Ok(match mask {
        Some(raw) => guard.sanitize_with_mask(value, &MaskToken::new(raw)?),
        None => guard.sanitize(value),
    })
}
