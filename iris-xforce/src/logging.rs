use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_NAME: &str = "iris-xforce.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_stderr(level: &str) -> anyhow::Result<()> {
  let filter = env_filter(level);
  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_target(true),
    )
    .try_init()?;
  Ok(())
}

pub fn init_file_and_stderr(
  log_dir: &Path,
  level: &str,
  retention_days: u64,
) -> anyhow::Result<()> {
  fs::create_dir_all(log_dir)?;
  cleanup_old_logs(log_dir, retention_days)?;

  let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
  let _ = FILE_GUARD.set(guard);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(file_writer)
    .with_target(true);

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .with_target(true);

  tracing_subscriber::registry()
    .with(env_filter(level))
    .with(file_layer)
    .with(stderr_layer)
    .try_init()?;

  Ok(())
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
  tracing_subscriber::EnvFilter::try_new(level)
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> anyhow::Result<()> {
  if retention_days == 0 {
    return Ok(());
  }

  let cutoff = SystemTime::now()
    .checked_sub(Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60)))
    .unwrap_or(SystemTime::UNIX_EPOCH);

  let entries = match fs::read_dir(log_dir) {
    Ok(e) => e,
    Err(_) => return Ok(()),
  };

  for entry in entries.flatten() {
    let path: PathBuf = entry.path();
    if !is_module_log_file(&path) {
      continue;
    }

    let modified = match entry.metadata().and_then(|m| m.modified()) {
      Ok(t) => t,
      Err(_) => continue,
    };

    if modified < cutoff {
      let _ = fs::remove_file(&path);
    }
  }

  Ok(())
}

fn is_module_log_file(path: &Path) -> bool {
  let name = match path.file_name().and_then(|n| n.to_str()) {
    Some(n) => n,
    None => return false,
  };

  name == LOG_FILE_NAME || name.starts_with("iris-xforce.log.")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Critical,
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Level::Info => "INFO",
      Level::Warn => "WARNING",
      Level::Error => "ERROR",
      Level::Critical => "CRITICAL",
    };
    f.write_str(s)
  }
}

/// Log lines of a single run, handed back to the host inside the outcome.
///
/// Every line is also emitted through `tracing`, so the module's own log sink sees
/// the same messages the host displays.
#[derive(Debug, Default)]
pub struct Transcript {
  lines: RefCell<Vec<String>>,
}

impl Transcript {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn info(&self, message: impl AsRef<str>) {
    self.push(Level::Info, message.as_ref());
  }

  pub fn warn(&self, message: impl AsRef<str>) {
    self.push(Level::Warn, message.as_ref());
  }

  pub fn error(&self, message: impl AsRef<str>) {
    self.push(Level::Error, message.as_ref());
  }

  pub fn critical(&self, message: impl AsRef<str>) {
    self.push(Level::Critical, message.as_ref());
  }

  pub fn lines(&self) -> Vec<String> {
    self.lines.borrow().clone()
  }

  pub fn contains(&self, needle: &str) -> bool {
    self.lines.borrow().iter().any(|l| l.contains(needle))
  }

  fn push(&self, level: Level, message: &str) {
    match level {
      Level::Info => tracing::info!(target: "iris_xforce", "{message}"),
      Level::Warn => tracing::warn!(target: "iris_xforce", "{message}"),
      Level::Error | Level::Critical => {
        tracing::error!(target: "iris_xforce", critical = (level == Level::Critical), "{message}")
      }
    }
    self.lines.borrow_mut().push(format!("[{level}] {message}"));
  }
}
