use anyhow::Context;

use crate::context::ModuleContext;
use crate::handler::DomainHandler;
use crate::hooks::{HookName, HookTable};
use crate::host::Host;
use crate::outcome::Outcome;
use crate::types::Ioc;
use crate::xforce::ReputationSource;

/// Entry point for a hook invocation. The returned outcome carries the dispatch
/// transcript and the IOC batch as data.
pub fn dispatch(
  table: &HookTable,
  ctx: &ModuleContext<'_>,
  source: &dyn ReputationSource,
  host: &mut dyn Host,
  hook_name: &str,
  iocs: &[Ioc],
) -> Outcome {
  let log = &ctx.log;
  log.info(format!("Received {hook_name} hook trigger"));

  let handler = hook_name
    .parse::<HookName>()
    .ok()
    .and_then(|hook| table.get(hook).map(|h| (hook, h)));

  let Some((hook, handler)) = handler else {
    log.critical(format!("Received unsupported hook {hook_name}"));
    return finish(
      ctx,
      Outcome::failure(format!("unsupported hook {hook_name}")),
      iocs,
    );
  };

  let status = handler(ctx, source, host, iocs);
  if status.is_failure() {
    log.error(format!("Error processing {hook} hook"));
  } else {
    log.info(format!("Successfully processed {hook} hook"));
  }

  finish(ctx, status, iocs)
}

/// Runs every supported IOC of the batch through the domain handler and merges the
/// results. Unsupported and malformed IOCs are logged and skipped.
pub fn handle_iocs(
  ctx: &ModuleContext<'_>,
  source: &dyn ReputationSource,
  host: &mut dyn Host,
  iocs: &[Ioc],
) -> Outcome {
  let handler = DomainHandler::new(ctx, source);
  let mut aggregate = Outcome::success();

  for ioc in iocs {
    match process_ioc(ctx, &handler, host, ioc) {
      Ok(Some(status)) => aggregate = aggregate.merge(status),
      Ok(None) => {}
      Err(e) => ctx
        .log
        .error(format!("Error handling IOC {}: {e:#}", ioc.type_name())),
    }
  }

  aggregate
}

fn process_ioc(
  ctx: &ModuleContext<'_>,
  handler: &DomainHandler<'_, '_>,
  host: &mut dyn Host,
  ioc: &Ioc,
) -> anyhow::Result<Option<Outcome>> {
  if !ioc.is_domain() {
    ctx.log.warn(format!(
      "IOC type {} not supported by xforce module. Skipping.",
      ioc.type_name()
    ));
    return Ok(None);
  }

  ioc
    .domain_value()
    .with_context(|| format!("malformed IOC {}", ioc.ioc_id))?;
  Ok(Some(handler.handle_domain(host, ioc)))
}

fn finish(ctx: &ModuleContext<'_>, status: Outcome, iocs: &[Ioc]) -> Outcome {
  let data = serde_json::to_value(iocs).unwrap_or(serde_json::Value::Null);
  status.with_data(data).with_logs(ctx.log.lines())
}
