//! Leveled diagnostic logging.
//!
//! Two named streams share one process-wide sink:
//!
//! ```text
//!   core_info!(..) ──┐                         ┌──────────────┐
//!                    ├──► emit(target, level) ─►│  LogSink     │──► stdout / memory / ...
//!   log_info!(..)  ──┘         │                └──────────────┘
//!                              └── dropped when no sink is installed,
//!                                  the level is below the minimum, or
//!                                  the build has no debug assertions
//! ```
//!
//! The `core_*` macros are used by the container itself (reallocation, copy,
//! move). The `log_*` macros are for client code. Nothing is printed until
//! [`init`] installs a sink, and [`shutdown`] removes it again.

use std::{
  env, fmt,
  io::{self, Write},
  str::FromStr,
  sync::{Arc, Mutex, PoisonError, RwLock},
  time::{SystemTime, UNIX_EPOCH},
};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV: &str = "RARRAY_LOG";

/// Severity of a record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
  Trace,
  Info,
  Warn,
  Error,
}

impl Level {
  pub fn as_str(self) -> &'static str {
    match self {
      Level::Trace => "trace",
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn ansi_color(self) -> &'static str {
    match self {
      Level::Trace => "\x1b[37m",
      Level::Info => "\x1b[32m",
      Level::Warn => "\x1b[33m",
      Level::Error => "\x1b[31m",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a level name is not one of `trace`, `info`, `warn`, `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "unknown log level `{}`", self.0)
  }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
  type Err = ParseLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "trace" => Ok(Level::Trace),
      "info" => Ok(Level::Info),
      "warn" | "warning" => Ok(Level::Warn),
      "error" => Ok(Level::Error),
      _ => Err(ParseLevelError(s.to_owned())),
    }
  }
}

/// Which stream a record was emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
  /// The container internals.
  Core,
  /// Application code using the container.
  Client,
}

impl Target {
  pub fn name(self) -> &'static str {
    match self {
      Target::Core => "CORE",
      Target::Client => "APP",
    }
  }
}

/// A single log event handed to a [`LogSink`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
  pub level: Level,
  pub target: Target,
  pub args: fmt::Arguments<'a>,
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
  fn log(
    &self,
    record: &Record<'_>,
  );

  fn flush(&self) {}
}

/// `HH:MM:SS UTC` for a Unix timestamp.
fn utc_time_of_day(epoch_secs: u64) -> String {
  let secs = epoch_secs % 86_400;
  format!(
    "{:02}:{:02}:{:02} UTC",
    secs / 3600,
    (secs / 60) % 60,
    secs % 60
  )
}

/// Writes `[HH:MM:SS UTC] CORE: message` lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
  color: bool,
}

impl StdoutSink {
  pub fn new() -> Self {
    Self { color: false }
  }

  /// Wraps every line in the ANSI colour of its level.
  pub fn colored() -> Self {
    Self { color: true }
  }
}

impl LogSink for StdoutSink {
  fn log(
    &self,
    record: &Record<'_>,
  ) {
    let secs = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or(0);
    let stamp = utc_time_of_day(secs);

    let mut out = io::stdout().lock();
    let _ = if self.color {
      writeln!(
        out,
        "{}[{stamp}] {}: {}\x1b[0m",
        record.level.ansi_color(),
        record.target.name(),
        record.args
      )
    } else {
      writeln!(
        out,
        "[{stamp}] {} {}: {}",
        record.target.name(),
        record.level,
        record.args
      )
    };
  }

  fn flush(&self) {
    let _ = io::stdout().flush();
  }
}

/// An owned copy of a [`Record`], as kept by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
  pub level: Level,
  pub target: Target,
  pub message: String,
}

/// Keeps every record in memory. Clones share the same buffer, so a test can
/// hand one clone to [`init`] and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
  records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> Vec<CapturedRecord> {
    self
      .records
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
}

impl LogSink for MemorySink {
  fn log(
    &self,
    record: &Record<'_>,
  ) {
    self
      .records
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(CapturedRecord {
        level: record.level,
        target: record.target,
        message: record.args.to_string(),
      });
  }
}

struct Logger {
  sink: Box<dyn LogSink>,
  min_level: Level,
}

static LOGGER: RwLock<Option<Logger>> = RwLock::new(None);

/// Installs `sink`, replacing (and flushing) any previous one.
pub fn init(
  sink: impl LogSink + 'static,
  min_level: Level,
) {
  let previous = LOGGER
    .write()
    .unwrap_or_else(PoisonError::into_inner)
    .replace(Logger {
      sink: Box::new(sink),
      min_level,
    });

  if let Some(previous) = previous {
    previous.sink.flush();
  }
}

/// Installs a coloured [`StdoutSink`] configured from `RARRAY_LOG`.
///
/// An unset variable means `trace`; `off` leaves logging disabled. Returns
/// whether a sink was installed.
pub fn init_from_env() -> Result<bool, ParseLevelError> {
  let level = match env::var(LOG_ENV) {
    Ok(value) if value.trim().eq_ignore_ascii_case("off") => return Ok(false),
    Ok(value) => value.parse()?,
    Err(_) => Level::Trace,
  };

  init(StdoutSink::colored(), level);
  Ok(true)
}

/// Flushes and removes the installed sink.
pub fn shutdown() {
  let previous = LOGGER.write().unwrap_or_else(PoisonError::into_inner).take();

  if let Some(previous) = previous {
    previous.sink.flush();
  }
}

/// Whether a record at `level` would currently reach a sink.
pub fn enabled(level: Level) -> bool {
  LOGGER
    .read()
    .unwrap_or_else(PoisonError::into_inner)
    .as_ref()
    .is_some_and(|logger| level >= logger.min_level)
}

#[doc(hidden)]
pub fn emit(
  target: Target,
  level: Level,
  args: fmt::Arguments<'_>,
) {
  let guard = LOGGER.read().unwrap_or_else(PoisonError::into_inner);

  if let Some(logger) = guard.as_ref() {
    if level >= logger.min_level {
      logger.sink.log(&Record { level, target, args });
    }
  }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
  ($target:ident, $level:ident, $($arg:tt)+) => {
    if cfg!(debug_assertions) {
      $crate::log::emit(
        $crate::log::Target::$target,
        $crate::log::Level::$level,
        format_args!($($arg)+),
      );
    }
  };
}

#[macro_export]
macro_rules! core_trace {
  ($($arg:tt)+) => { $crate::__emit!(Core, Trace, $($arg)+) };
}

#[macro_export]
macro_rules! core_info {
  ($($arg:tt)+) => { $crate::__emit!(Core, Info, $($arg)+) };
}

#[macro_export]
macro_rules! core_warn {
  ($($arg:tt)+) => { $crate::__emit!(Core, Warn, $($arg)+) };
}

#[macro_export]
macro_rules! core_error {
  ($($arg:tt)+) => { $crate::__emit!(Core, Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_trace {
  ($($arg:tt)+) => { $crate::__emit!(Client, Trace, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
  ($($arg:tt)+) => { $crate::__emit!(Client, Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
  ($($arg:tt)+) => { $crate::__emit!(Client, Warn, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
  ($($arg:tt)+) => { $crate::__emit!(Client, Error, $($arg)+) };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_level() {
    assert_eq!("trace".parse::<Level>(), Ok(Level::Trace));
    assert_eq!(" WARN ".parse::<Level>(), Ok(Level::Warn));
    assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
    assert_eq!("Error".parse::<Level>(), Ok(Level::Error));
    assert!("verbose".parse::<Level>().is_err());
  }

  #[test]
  fn test_level_order() {
    assert!(Level::Trace < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
  }

  #[test]
  fn test_utc_time_of_day() {
    assert_eq!(utc_time_of_day(0), "00:00:00 UTC");
    assert_eq!(utc_time_of_day(86_400 * 3 + 3600 + 61), "01:01:01 UTC");
    assert_eq!(utc_time_of_day(86_399), "23:59:59 UTC");
  }

  // The sink is process wide, so the whole lifecycle lives in one test.
  // Only client records are inspected since other tests emit core records.
  #[test]
  fn test_sink_lifecycle() {
    let sink = MemorySink::new();
    let client = |sink: &MemorySink| {
      sink
        .records()
        .into_iter()
        .filter(|r| r.target == Target::Client)
        .collect::<Vec<_>>()
    };

    log_info!("before init");
    assert!(client(&sink).is_empty());

    init(sink.clone(), Level::Warn);
    assert!(!enabled(Level::Info));
    assert!(enabled(Level::Error));

    log_info!("filtered out");
    log_warn!("kept {}", 1);
    log_error!("kept {}", 2);

    let kept = client(&sink);
    if cfg!(debug_assertions) {
      assert_eq!(kept.len(), 2);
      assert_eq!(kept[0].level, Level::Warn);
      assert_eq!(kept[0].message, "kept 1");
      assert_eq!(kept[1].level, Level::Error);
    } else {
      assert!(kept.is_empty());
    }

    shutdown();
    assert!(!enabled(Level::Error));

    log_error!("after shutdown");
    assert_eq!(client(&sink).len(), kept.len());
  }
}
