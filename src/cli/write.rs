use std::path::Path;

use crate::config::Settings;
use crate::context::{ContextMap, ContextValue};
use crate::error::Result;
use crate::logger::Logger;

pub struct WriteArgs<'a> {
    pub level: &'a str,
    pub message: &'a str,
    pub channel: Option<&'a str>,
    pub context: Option<&'a str>,
    pub dir: Option<&'a Path>,
}

/// Push one entry through the full pipeline into its channel's log file.
pub fn run(settings: &Settings, args: WriteArgs<'_>) -> Result<bool> {
    let mut settings = settings.clone();
    if let Some(dir) = args.dir {
        settings.logger.directory = dir.to_path_buf();
    }
    let logger = Logger::from_settings(&settings)?;

    let level = logger.guard().validate_log_level(args.level)?;
    let context: ContextValue = match args.context {
        Some(raw) => serde_json::from_str::<serde_json::Value>(raw)?.into(),
        None => ContextMap::new().into(),
    };

    let written = match args.channel {
        Some(channel) => logger.log_to(channel, level, args.message, context)?,
        None => logger.log(level, args.message, context)?,
    };
    if !written {
        eprintln!("logsec: entry below minimum level {}, skipped.", logger.min_level());
    }
    Ok(true)
}
