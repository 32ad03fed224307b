//! Validation and secret-masking pipeline for structured application logs.
//!
//! Every entry passes through a [`LogGuard`](guard::LogGuard) before it is
//! written: the context is sanitized (sensitive keys and values masked,
//! depth bounded, cycles broken), then every field is validated and
//! normalized. Only a fully validated [`LogEntry`](entry::LogEntry) reaches a
//! [`LogWriter`](writer::LogWriter).

pub mod cli;
pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod guard;
pub mod logger;
pub mod normalize;
pub mod sanitize;
pub mod scan;
pub mod validate;
pub mod writer;

pub use context::{ContextMap, ContextValue, SharedMap};
pub use entry::{LogEntry, LogLevel};
pub use error::{ConfigError, LogsecError, Result, ValidationError};
pub use guard::LogGuard;
pub use logger::Logger;
