use crate::hooks::HookName;
use crate::outcome::Outcome;
use crate::types::{AttributeField, Ioc};

/// The calls this module makes into the IRIS platform.
pub trait Host {
  /// Subscribes the module to `hook`. The platform acknowledges with an outcome.
  fn register_to_hook(&mut self, module_id: i64, hook: HookName) -> anyhow::Result<Outcome>;

  /// Unsubscribes the module from `hook`. Must succeed when not subscribed.
  fn deregister_from_hook(&mut self, module_id: i64, hook: HookName) -> anyhow::Result<()>;

  /// Attaches `field` to the IOC, creating its tab when needed.
  fn add_tab_attribute_field(&mut self, ioc: &Ioc, field: &AttributeField) -> anyhow::Result<()>;
}
