use super::HookName;
use crate::config::HookFlags;
use crate::host::Host;
use crate::logging::Transcript;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
  pub registered: Vec<HookName>,
  pub deregistered: Vec<HookName>,
  /// Disabled hooks the host could not deregister. These do not fail activation.
  pub deregister_failed: Vec<(HookName, String)>,
  pub failed: Vec<(HookName, String)>,
  pub logs: Vec<String>,
}

/// Brings the host-side subscriptions in line with `flags`.
///
/// Enabled hooks are registered, disabled ones are deregistered. A hook that fails
/// to register is logged and skipped; the remaining hooks are still processed.
pub fn register_hooks(host: &mut dyn Host, module_id: i64, flags: &HookFlags) -> RegistrationReport {
  let log = Transcript::new();
  let mut report = RegistrationReport::default();

  for hook in HookName::ALL {
    if hook.enabled_in(flags) {
      match host.register_to_hook(module_id, hook) {
        Ok(status) if status.is_failure() => {
          log.error(format!("Failed to register {hook} hook: {}", status.message()));
          if let Some(data) = &status.data {
            log.error(data.to_string());
          }
          report.failed.push((hook, status.message().to_string()));
        }
        Ok(_) => {
          log.info(format!("Successfully registered {hook} hook"));
          report.registered.push(hook);
        }
        Err(e) => {
          log.error(format!("Error registering {hook} hook: {e:#}"));
          report.failed.push((hook, format!("{e:#}")));
        }
      }
    } else {
      match host.deregister_from_hook(module_id, hook) {
        Ok(()) => {
          log.info(format!(
            "{hook} hook not enabled ({} = false), deregistered if previously registered.",
            hook.config_key()
          ));
          report.deregistered.push(hook);
        }
        Err(e) => {
          log.warn(format!(
            "{hook} hook not enabled ({} = false), but deregistration failed: {e:#}",
            hook.config_key()
          ));
          report.deregister_failed.push((hook, format!("{e:#}")));
        }
      }
    }
  }

  report.logs = log.lines();
  report
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::outcome::Outcome;
  use crate::types::{AttributeField, Ioc};
  use std::collections::BTreeSet;

  #[derive(Default)]
  struct SubscriptionHost {
    subscribed: BTreeSet<HookName>,
    refuse: Option<HookName>,
    explode: Option<HookName>,
    stuck: Option<HookName>,
    deregister_calls: Vec<HookName>,
  }

  impl Host for SubscriptionHost {
    fn register_to_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<Outcome> {
      if self.explode == Some(hook) {
        anyhow::bail!("database unavailable");
      }
      if self.refuse == Some(hook) {
        return Ok(Outcome::failure("hook unknown to this IRIS version"));
      }
      self.subscribed.insert(hook);
      Ok(Outcome::success())
    }

    fn deregister_from_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<()> {
      self.deregister_calls.push(hook);
      if self.stuck == Some(hook) {
        anyhow::bail!("subscription row locked");
      }
      self.subscribed.remove(&hook);
      Ok(())
    }

    fn add_tab_attribute_field(&mut self, _: &Ioc, _: &AttributeField) -> anyhow::Result<()> {
      unreachable!("registration never writes attributes")
    }
  }

  #[test]
  fn registers_enabled_and_deregisters_disabled() {
    let mut host = SubscriptionHost::default();
    host.subscribed.insert(HookName::OnPostloadIocUpdate);

    let flags = HookFlags {
      on_create: true,
      on_update: false,
      on_manual_trigger: true,
    };
    let report = register_hooks(&mut host, 7, &flags);

    assert_eq!(
      report.registered,
      vec![HookName::OnPostloadIocCreate, HookName::OnManualTriggerIoc]
    );
    assert_eq!(report.deregistered, vec![HookName::OnPostloadIocUpdate]);
    assert!(report.failed.is_empty());
    assert!(!host.subscribed.contains(&HookName::OnPostloadIocUpdate));
  }

  #[test]
  fn deregistering_twice_is_harmless() {
    let mut host = SubscriptionHost::default();
    let flags = HookFlags::default();

    register_hooks(&mut host, 1, &flags);
    let report = register_hooks(&mut host, 1, &flags);

    assert_eq!(report.deregistered, HookName::ALL.to_vec());
    assert_eq!(host.deregister_calls.len(), 6);
    assert!(host.subscribed.is_empty());
  }

  #[test]
  fn failures_do_not_stop_remaining_hooks() {
    let mut host = SubscriptionHost {
      refuse: Some(HookName::OnPostloadIocCreate),
      explode: Some(HookName::OnPostloadIocUpdate),
      ..SubscriptionHost::default()
    };
    let flags = HookFlags {
      on_create: true,
      on_update: true,
      on_manual_trigger: true,
    };
    let report = register_hooks(&mut host, 3, &flags);

    assert_eq!(report.registered, vec![HookName::OnManualTriggerIoc]);
    assert_eq!(report.failed.len(), 2);
    assert!(report
      .logs
      .iter()
      .any(|l| l.contains("Failed to register on_postload_ioc_create hook")));
    assert!(report
      .logs
      .iter()
      .any(|l| l.contains("Error registering on_postload_ioc_update hook: database unavailable")));
  }

  #[test]
  fn deregistration_failure_is_reported_not_hidden() {
    let mut host = SubscriptionHost {
      stuck: Some(HookName::OnPostloadIocUpdate),
      ..SubscriptionHost::default()
    };
    host.subscribed.insert(HookName::OnPostloadIocUpdate);
    let flags = HookFlags {
      on_create: false,
      on_update: false,
      on_manual_trigger: true,
    };
    let report = register_hooks(&mut host, 2, &flags);

    assert_eq!(report.registered, vec![HookName::OnManualTriggerIoc]);
    assert_eq!(report.deregistered, vec![HookName::OnPostloadIocCreate]);
    assert_eq!(
      report.deregister_failed,
      vec![(HookName::OnPostloadIocUpdate, "subscription row locked".to_string())]
    );
    assert!(report.failed.is_empty());
    assert!(report.logs.iter().any(|l| l.starts_with("[WARNING] on_postload_ioc_update hook")
      && l.contains("deregistration failed: subscription row locked")));
    assert!(!report
      .logs
      .iter()
      .any(|l| l.contains("on_postload_ioc_update hook not enabled") && l.contains("deregistered if")));
  }
}
