use std::collections::BTreeMap;

use super::HookName;
use crate::context::ModuleContext;
use crate::dispatcher;
use crate::host::Host;
use crate::outcome::Outcome;
use crate::types::Ioc;
use crate::xforce::ReputationSource;

pub type HookHandler =
  fn(&ModuleContext<'_>, &dyn ReputationSource, &mut dyn Host, &[Ioc]) -> Outcome;

/// Which handler serves which hook.
#[derive(Default)]
pub struct HookTable {
  handlers: BTreeMap<HookName, HookHandler>,
}

impl HookTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// All three IOC hooks routed to the IOC batch handler.
  pub fn standard() -> Self {
    let mut table = Self::new();
    for hook in HookName::ALL {
      table.handlers.insert(hook, dispatcher::handle_iocs as HookHandler);
    }
    table
  }

  pub fn register(&mut self, hook: HookName, handler: HookHandler) -> anyhow::Result<()> {
    if self.handlers.contains_key(&hook) {
      anyhow::bail!("hook {hook} already has a handler");
    }
    self.handlers.insert(hook, handler);
    Ok(())
  }

  pub fn get(&self, hook: HookName) -> Option<HookHandler> {
    self.handlers.get(&hook).copied()
  }

  pub fn hooks(&self) -> impl Iterator<Item = HookName> + '_ {
    self.handlers.keys().copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn noop(
    _: &ModuleContext<'_>,
    _: &dyn ReputationSource,
    _: &mut dyn Host,
    _: &[Ioc],
  ) -> Outcome {
    Outcome::success()
  }

  #[test]
  fn standard_table_covers_every_hook() {
    let table = HookTable::standard();
    assert_eq!(table.hooks().collect::<Vec<_>>(), HookName::ALL.to_vec());
  }

  #[test]
  fn duplicate_registration_is_rejected() {
    let mut table = HookTable::new();
    table.register(HookName::OnManualTriggerIoc, noop).unwrap();
    assert!(table.register(HookName::OnManualTriggerIoc, noop).is_err());
    assert!(table.get(HookName::OnManualTriggerIoc).is_some());
    assert!(table.get(HookName::OnPostloadIocCreate).is_none());
  }
}
