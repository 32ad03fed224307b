use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::sanitize::SensitivePatternDetector;
use crate::scan::{build_globset, scan_path, DEFAULT_LOG_GLOB};

/// Scan log files for secrets that slipped past sanitization. Defaults to
/// the configured log directory and `*.log`.
pub fn run(settings: &Settings, path: Option<&Path>, globs: &[String]) -> Result<bool> {
    let target = path.unwrap_or(settings.logger.directory.as_path());
    if !target.exists() {
        eprintln!("logsec: path not found: {}", target.display());
        return Ok(false);
    }

    let detector = SensitivePatternDetector::new(&settings.sanitization.sensitive_patterns)?;
    let include = if globs.is_empty() {
        build_globset(&[DEFAULT_LOG_GLOB])?
    } else {
        build_globset(globs)?
    };

    eprintln!("logsec: scanning {}...", target.display());
    let findings = scan_path(target, &detector, &include)?;
    for finding in &findings {
        eprintln!(
            "  {}:{}: potential secret detected ({})",
            finding.file.display(),
            finding.line,
            finding.detector
        );
    }

    if findings.is_empty() {
        eprintln!("logsec: scan clean -- no secrets detected.");
        Ok(true)
    } else {
        eprintln!("\nlogsec: {} potential secret(s) found.", findings.len());
        Ok(false)
    }
}
