use crate::context::ModuleContext;
use crate::host::Host;
use crate::outcome::Outcome;
use crate::template;
use crate::types::{AttributeField, Ioc};
use crate::xforce::ReputationSource;

/// Enriches domain IOCs with an X-Force report.
pub struct DomainHandler<'c, 'a> {
  ctx: &'c ModuleContext<'a>,
  source: &'c dyn ReputationSource,
}

impl<'c, 'a> DomainHandler<'c, 'a> {
  pub fn new(ctx: &'c ModuleContext<'a>, source: &'c dyn ReputationSource) -> Self {
    Self { ctx, source }
  }

  pub fn handle_domain(&self, host: &mut dyn Host, ioc: &Ioc) -> Outcome {
    let log = &self.ctx.log;
    let domain = match ioc.domain_value() {
      Ok(d) => d,
      Err(e) => {
        log.error(format!("Failed to fetch domain report: {e:#}"));
        return Outcome::failure(format!("Failed to fetch domain report: {e:#}"));
      }
    };

    log.info(format!("Getting domain report for {domain}"));
    let report = match self.source.domain_reputation(domain) {
      Ok(r) => r,
      Err(e) => {
        log.error(format!("Failed to fetch domain report: {e:#}"));
        return Outcome::failure(format!("Failed to fetch domain report: {e:#}"));
      }
    };

    if !self.ctx.config.xforce_report_as_attribute {
      log.info("Skipped adding attribute report. Option disabled");
      return Outcome::success();
    }

    log.info("Adding new attribute X-Force Domain Report to IOC");
    let rendered = match self.gen_domain_report(&report) {
      Ok(html) => html,
      Err(status) => return status,
    };

    let field = AttributeField::html_report(rendered);
    if let Err(e) = host.add_tab_attribute_field(ioc, &field) {
      log.error(format!("Failed to add attribute field: {e:#}"));
      return Outcome::failure(format!("Failed to add attribute field: {e:#}"));
    }

    tracing::info!(ioc_id = ioc.ioc_id, domain = %domain, "X-Force report attached");
    Outcome::success()
  }

  fn gen_domain_report(&self, report: &serde_json::Value) -> Result<String, Outcome> {
    template::render(&self.ctx.config.xforce_domain_report_template, report).map_err(|e| {
      self.ctx.log.error(format!("Template rendering failed: {e}"));
      Outcome::failure(format!("Template rendering failed: {e}"))
    })
  }
}
