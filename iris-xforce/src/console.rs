use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use crate::descriptor;
use crate::hooks::HookName;
use crate::host::Host;
use crate::outcome::Outcome;
use crate::types::{AttributeField, Ioc};

const DEFAULT_CONFIG_PATH: &str = "iris-xforce.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
  Help,
  Describe,
  Enrich(EnrichArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichArgs {
  pub config_path: PathBuf,
  pub hook: String,
  pub ioc_type: String,
  pub values: Vec<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<ConsoleAction> {
  let args = args.get(1..).unwrap_or_default();

  if args.iter().any(|a| a == "--help" || a == "-h") {
    return Ok(ConsoleAction::Help);
  }
  if args.iter().any(|a| a == "--describe") {
    return Ok(ConsoleAction::Describe);
  }

  let mut out = EnrichArgs {
    config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
    hook: HookName::OnManualTriggerIoc.as_str().to_string(),
    ioc_type: "domain".to_string(),
    values: Vec::new(),
  };

  let mut iter = args.iter();
  while let Some(arg) = iter.next() {
    match arg.as_str() {
      "--config" => out.config_path = PathBuf::from(flag_value(&mut iter, "--config")?),
      "--hook" => out.hook = flag_value(&mut iter, "--hook")?,
      "--type" => out.ioc_type = flag_value(&mut iter, "--type")?,
      other if other.starts_with("--") => anyhow::bail!("unknown option `{other}`"),
      value => out.values.push(value.to_string()),
    }
  }

  if out.values.is_empty() {
    anyhow::bail!("expected at least one IOC value (see --help)");
  }
  Ok(ConsoleAction::Enrich(out))
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<String> {
  iter
    .next()
    .cloned()
    .ok_or_else(|| anyhow::anyhow!("`{flag}` expects a value"))
}

pub fn iocs_from_args(args: &EnrichArgs) -> Vec<Ioc> {
  args
    .values
    .iter()
    .enumerate()
    .map(|(i, v)| Ioc::new(i as i64 + 1, &args.ioc_type, v))
    .collect()
}

pub fn print_help() {
  println!("iris-xforce {}", env!("CARGO_PKG_VERSION"));
  println!();
  println!("Enrich IOCs with IBM X-Force Exchange reports outside of IRIS.");
  println!();
  println!("USAGE:");
  println!("  iris-xforce [--config <path>] [--hook <name>] [--type <ioc type>] <value>...");
  println!("  iris-xforce --describe");
  println!("  iris-xforce --version");
  println!();
  println!("Defaults: --config {DEFAULT_CONFIG_PATH}, --hook on_manual_trigger_ioc, --type domain");
}

pub fn print_description() -> anyhow::Result<()> {
  let doc = serde_json::json!({
    "module": descriptor::module_info(),
    "configuration": descriptor::module_configuration(),
  });
  println!("{}", serde_json::to_string_pretty(&doc)?);
  Ok(())
}

/// Stands in for IRIS when the module is driven from the console. Attributes are
/// written as JSON lines.
pub struct ConsoleHost<W: Write> {
  out: W,
  subscribed: BTreeSet<HookName>,
}

impl<W: Write> ConsoleHost<W> {
  pub fn new(out: W) -> Self {
    Self {
      out,
      subscribed: BTreeSet::new(),
    }
  }

  pub fn is_subscribed(&self, hook: HookName) -> bool {
    self.subscribed.contains(&hook)
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}

impl<W: Write> Host for ConsoleHost<W> {
  fn register_to_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<Outcome> {
    self.subscribed.insert(hook);
    Ok(Outcome::success())
  }

  fn deregister_from_hook(&mut self, _module_id: i64, hook: HookName) -> anyhow::Result<()> {
    self.subscribed.remove(&hook);
    Ok(())
  }

  fn add_tab_attribute_field(&mut self, ioc: &Ioc, field: &AttributeField) -> anyhow::Result<()> {
    let line = serde_json::json!({
      "ioc_id": ioc.ioc_id,
      "ioc_value": ioc.ioc_value,
      "attribute": field,
    });
    writeln!(self.out, "{line}")?;
    Ok(())
  }
}
