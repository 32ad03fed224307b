use std::path::Path;

use crate::config::Settings;
use crate::error::Result;

/// Write a default `.logsec/config.yml` under `root`. An existing file is
/// left untouched.
pub fn run(root: &Path) -> Result<bool> {
    let path = Settings::project_path(root);
    if path.exists() {
        eprintln!("logsec: {} already exists, leaving it as is.", path.display());
        return Ok(true);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Settings::default().to_yaml()?)?;
    eprintln!("logsec: wrote {}", path.display());
    Ok(true)
}
