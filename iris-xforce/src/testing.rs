//! Fakes for the host and the reputation source.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::hooks::HookName;
use crate::host::Host;
use crate::outcome::Outcome;
use crate::types::{AttributeField, Ioc};
use crate::xforce::ReputationSource;

#[derive(Default)]
pub struct RecordingHost {
  pub subscribed: BTreeSet<HookName>,
  pub attributes: Vec<(i64, AttributeField)>,
  pub reject_writes: bool,
}

impl Host for RecordingHost {
  fn register_to_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<Outcome> {
    self.subscribed.insert(hook);
    Ok(Outcome::success())
  }

  fn deregister_from_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<()> {
    self.subscribed.remove(&hook);
    Ok(())
  }

  fn add_tab_attribute_field(&mut self, ioc: &Ioc, field: &AttributeField) -> anyhow::Result<()> {
    if self.reject_writes {
      anyhow::bail!("field value rejected");
    }
    self.attributes.push((ioc.ioc_id, field.clone()));
    Ok(())
  }
}

/// Answers from a fixed table; unknown domains fail like an X-Force 404.
#[derive(Default)]
pub struct StaticSource {
  reports: BTreeMap<String, serde_json::Value>,
  calls: RefCell<Vec<String>>,
}

impl StaticSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, domain: &str, report: serde_json::Value) -> Self {
    self.reports.insert(domain.to_string(), report);
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }
}

impl ReputationSource for StaticSource {
  fn domain_reputation(&self, domain: &str) -> anyhow::Result<serde_json::Value> {
    self.calls.borrow_mut().push(domain.to_string());
    self
      .reports
      .get(domain)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("unexpected HTTP status 404 for {domain}"))
  }
}
