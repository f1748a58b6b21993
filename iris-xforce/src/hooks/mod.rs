use crate::config::HookFlags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod registrar;
mod table;

pub use registrar::{register_hooks, RegistrationReport};
pub use table::{HookHandler, HookTable};

/// IOC lifecycle events the module can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookName {
  OnPostloadIocCreate,
  OnPostloadIocUpdate,
  OnManualTriggerIoc,
}

impl HookName {
  pub const ALL: [HookName; 3] = [
    HookName::OnPostloadIocCreate,
    HookName::OnPostloadIocUpdate,
    HookName::OnManualTriggerIoc,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      HookName::OnPostloadIocCreate => "on_postload_ioc_create",
      HookName::OnPostloadIocUpdate => "on_postload_ioc_update",
      HookName::OnManualTriggerIoc => "on_manual_trigger_ioc",
    }
  }

  /// Configuration parameter that enables this hook.
  pub fn config_key(self) -> &'static str {
    match self {
      HookName::OnPostloadIocCreate => "xforce_on_create_hook_enabled",
      HookName::OnPostloadIocUpdate => "xforce_on_update_hook_enabled",
      HookName::OnManualTriggerIoc => "xforce_manual_hook_enabled",
    }
  }

  pub fn enabled_in(self, flags: &HookFlags) -> bool {
    match self {
      HookName::OnPostloadIocCreate => flags.on_create,
      HookName::OnPostloadIocUpdate => flags.on_update,
      HookName::OnManualTriggerIoc => flags.on_manual_trigger,
    }
  }
}

impl fmt::Display for HookName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for HookName {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    HookName::ALL
      .into_iter()
      .find(|h| h.as_str() == s)
      .ok_or_else(|| anyhow::anyhow!("unsupported hook {s}"))
  }
}
