use crate::config::Settings;
use crate::error::Result;
use crate::guard::LogGuard;

/// Print `sensitive` or `ok` for each key. Returns `false` if any key is
/// sensitive.
pub fn run(settings: &Settings, keys: &[String]) -> Result<bool> {
    let guard = LogGuard::from_settings(settings)?;
    let mut clean = true;
    for key in keys {
        let sensitive = guard.is_sensitive_key(key);
        clean &= !sensitive;
        println!("{}: {}", key, if sensitive { "sensitive" } else { "ok" });
    }
    Ok(clean)
}
