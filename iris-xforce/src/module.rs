use anyhow::Context;

use crate::config::{ModuleConfig, ServerConfig};
use crate::context::ModuleContext;
use crate::dispatcher;
use crate::hooks::{self, HookTable, RegistrationReport};
use crate::host::Host;
use crate::outcome::Outcome;
use crate::types::Ioc;
use crate::xforce::{ReputationSource, XforceClient};

/// One activation of the module inside IRIS.
pub struct XforceModule {
  config: ModuleConfig,
  source: Box<dyn ReputationSource>,
  table: HookTable,
  module_id: Option<i64>,
}

impl XforceModule {
  pub fn new(config: ModuleConfig, server: &ServerConfig) -> anyhow::Result<Self> {
    config.validate()?;
    let client = XforceClient::new(&config, server).context("create X-Force client")?;
    Ok(Self::with_source(config, Box::new(client)))
  }

  pub fn with_source(config: ModuleConfig, source: Box<dyn ReputationSource>) -> Self {
    Self {
      config,
      source,
      table: HookTable::standard(),
      module_id: None,
    }
  }

  pub fn config(&self) -> &ModuleConfig {
    &self.config
  }

  pub fn module_id(&self) -> Option<i64> {
    self.module_id
  }

  pub fn register_hooks(&mut self, host: &mut dyn Host, module_id: i64) -> RegistrationReport {
    self.module_id = Some(module_id);
    let report = hooks::register_hooks(host, module_id, &self.config.hook_flags());
    tracing::info!(
      module_id,
      registered = report.registered.len(),
      failed = report.failed.len(),
      deregister_failed = report.deregister_failed.len(),
      "hook registration finished"
    );
    report
  }

  /// Host callback for a triggered hook. `hook_ui_name` is only used for logging.
  pub fn hooks_handler(
    &self,
    host: &mut dyn Host,
    hook_name: &str,
    hook_ui_name: &str,
    iocs: &[Ioc],
  ) -> Outcome {
    let ctx = ModuleContext::new(&self.config);
    let status = dispatcher::dispatch(&self.table, &ctx, self.source.as_ref(), host, hook_name, iocs);

    if status.is_failure() {
      tracing::error!(hook = %hook_name, ui_name = %hook_ui_name, iocs = iocs.len(), "hook failed");
    } else {
      tracing::info!(hook = %hook_name, ui_name = %hook_ui_name, iocs = iocs.len(), "hook processed");
    }
    status
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hooks::HookName;
  use crate::testing::{RecordingHost, StaticSource};
  use serde_json::json;

  #[test]
  fn activation_registers_then_enriches() {
    let mut cfg = ModuleConfig::new("https://api.xforce.ibmcloud.com", "key:secret");
    cfg.xforce_on_create_hook_enabled = true;
    cfg.xforce_domain_report_template = "<p>{{ results.score }}</p>".to_string();
    let source = StaticSource::new().with("example.com", json!({"score": 1}));

    let mut module = XforceModule::with_source(cfg, Box::new(source));
    let mut host = RecordingHost::default();

    let report = module.register_hooks(&mut host, 5);
    assert_eq!(module.module_id(), Some(5));
    assert_eq!(
      report.registered,
      vec![HookName::OnPostloadIocCreate, HookName::OnManualTriggerIoc]
    );
    assert!(host.subscribed.contains(&HookName::OnPostloadIocCreate));

    let status = module.hooks_handler(
      &mut host,
      "on_postload_ioc_create",
      "X-Force enrichment",
      &[Ioc::new(9, "domain", "example.com")],
    );
    assert!(status.is_success());
    assert_eq!(host.attributes[0].1.field_value, "<p>1</p>");
  }

  #[test]
  fn new_rejects_invalid_configuration() {
    let cfg = ModuleConfig::new("https://api.xforce.ibmcloud.com", "");
    assert!(XforceModule::new(cfg, &ServerConfig::default()).is_err());
  }

  #[test]
  fn new_builds_live_client() {
    let cfg = ModuleConfig::new("https://api.xforce.ibmcloud.com", "key:secret");
    let module = XforceModule::new(cfg, &ServerConfig::default()).unwrap();
    assert!(module.config().xforce_report_as_attribute);
  }
}
