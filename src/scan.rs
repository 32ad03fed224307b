//! Post-hoc audit of written log files for values that look like secrets.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{ConfigError, Result};
use crate::sanitize::SensitivePatternDetector;

/// Default include pattern for [`scan_path`].
pub const DEFAULT_LOG_GLOB: &str = "*.log";

/// A line that matched a sensitive pattern. The matched text is never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: PathBuf,
    pub line: usize,
    pub detector: String,
}

pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> std::result::Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = Glob::new(pattern).map_err(|e| ConfigError::GlobPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::GlobPattern {
        pattern: String::new(),
        reason: e.to_string(),
    })
}

/// Scan a file, or every file under a directory whose name matches
/// `include`. Hidden directories are skipped. A missing path yields no
/// findings.
pub fn scan_path(
    path: &Path,
    detector: &SensitivePatternDetector,
    include: &GlobSet,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    if path.is_dir() {
        scan_dir(path, detector, include, &mut findings)?;
    } else if path.is_file() {
        scan_file(path, detector, &mut findings)?;
    }
    Ok(findings)
}

fn scan_dir(
    dir: &Path,
    detector: &SensitivePatternDetector,
    include: &GlobSet,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if path.is_dir() {
            if !hidden {
                scan_dir(&path, detector, include, findings)?;
            }
        } else if path.is_file()
            && path.file_name().is_some_and(|n| include.is_match(n))
        {
            scan_file(&path, detector, findings)?;
        }
    }
    Ok(())
}

fn scan_file(
    path: &Path,
    detector: &SensitivePatternDetector,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            return Ok(());
        }
    };

    // An invalid byte only affects its own line.
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_num = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;
        let line = String::from_utf8_lossy(&buf);
        for index in detector.matching(&line) {
            findings.push(Finding {
                file: path.to_path_buf(),
                line: line_num,
                detector: format!("pattern-{index}"),
            });
        }
    }
    Ok(())
}
