mod client;

pub use client::XforceClient;

/// Source of domain reputation reports.
pub trait ReputationSource {
  fn domain_reputation(&self, domain: &str) -> anyhow::Result<serde_json::Value>;
}
