use crate::config::ModuleConfig;
use crate::logging::Transcript;

/// State shared by the pieces of one dispatch: the activation's configuration and
/// the transcript returned to the host.
pub struct ModuleContext<'a> {
  pub config: &'a ModuleConfig,
  pub log: Transcript,
}

impl<'a> ModuleContext<'a> {
  pub fn new(config: &'a ModuleConfig) -> Self {
    Self {
      config,
      log: Transcript::new(),
    }
  }
}
