pub mod config;
pub mod console;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod handler;
pub mod hooks;
pub mod host;
pub mod logging;
pub mod module;
pub mod outcome;
pub mod template;
pub mod types;
pub mod xforce;

#[cfg(test)]
mod testing;

use anyhow::Context;
use std::path::Path;

pub use module::XforceModule;
pub use outcome::Outcome;

/// Runs the operator console. Returns whether the enrichment succeeded.
pub fn run_console(args: &[String]) -> anyhow::Result<bool> {
  let enrich = match console::parse_args(args)? {
    console::ConsoleAction::Help => {
      console::print_help();
      return Ok(true);
    }
    console::ConsoleAction::Describe => {
      console::print_description()?;
      return Ok(true);
    }
    console::ConsoleAction::Enrich(a) => a,
  };

  let cfg = config::load_console_config(&enrich.config_path)?;
  match cfg.logging.dir.as_deref() {
    Some(dir) => {
      logging::init_file_and_stderr(Path::new(dir), &cfg.logging.level, cfg.logging.retention_days)?
    }
    None => logging::init_stderr(&cfg.logging.level)?,
  }

  let mut module =
    XforceModule::new(cfg.module, &cfg.server).context("invalid module configuration")?;
  let mut host = console::ConsoleHost::new(std::io::stdout().lock());

  let registration = module.register_hooks(&mut host, 0);
  for (hook, reason) in &registration.failed {
    tracing::warn!(hook = %hook, reason = %reason, "hook registration failed");
  }

  let iocs = console::iocs_from_args(&enrich);
  tracing::info!(hook = %enrich.hook, iocs = iocs.len(), "starting console enrichment");
  let status = module.hooks_handler(&mut host, &enrich.hook, "console", &iocs);

  if status.is_failure() {
    tracing::error!(message = %status.message(), "enrichment finished with errors");
  }
  Ok(status.is_success())
}
