use crate::config::{ModuleConfig, ServerConfig};
use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Proxy, Url};
use std::io::Read;

use super::ReputationSource;

const MAX_REPORT_BYTES: usize = 4 * 1024 * 1024;

/// Blocking client for the X-Force Exchange REST API.
pub struct XforceClient {
  client: Client,
  base: Url,
  authorization: String,
}

impl XforceClient {
  pub fn new(module: &ModuleConfig, server: &ServerConfig) -> anyhow::Result<Self> {
    let base = Url::parse(module.xforce_url.trim())
      .with_context(|| format!("invalid xforce_url: {}", module.xforce_url))?;
    if base.cannot_be_a_base() {
      anyhow::bail!("xforce_url cannot be used as a base URL");
    }

    let mut builder = Client::builder();
    let mut proxied = false;
    if let Some(p) = server.http_proxy() {
      builder = builder.proxy(Proxy::http(p).with_context(|| format!("invalid http_proxy: {p}"))?);
      proxied = true;
    }
    if let Some(p) = server.https_proxy() {
      builder =
        builder.proxy(Proxy::https(p).with_context(|| format!("invalid https_proxy: {p}"))?);
      proxied = true;
    }
    if !proxied {
      // Proxying is decided by the server configuration, not the process environment.
      builder = builder.no_proxy();
    }

    let client = builder.build().context("build HTTP client")?;

    Ok(Self {
      client,
      base,
      authorization: authorization_value(module.xforce_key.expose()),
    })
  }

  pub fn domain_url(&self, domain: &str) -> anyhow::Result<Url> {
    domain_url(&self.base, domain)
  }
}

impl ReputationSource for XforceClient {
  fn domain_reputation(&self, domain: &str) -> anyhow::Result<serde_json::Value> {
    let url = self.domain_url(domain)?;
    let response = self
      .client
      .get(url.clone())
      .header(ACCEPT, "application/json")
      .header(AUTHORIZATION, &self.authorization)
      .header(USER_AGENT, format!("iris-xforce/{}", env!("CARGO_PKG_VERSION")))
      .send()
      .with_context(|| format!("GET {}", safe_url_label(&url)))?;

    let status = response.status().as_u16();
    if status != 200 {
      anyhow::bail!(
        "unexpected HTTP status {} for {}",
        status,
        safe_url_label(&url)
      );
    }

    let body = read_response_with_limit(response, MAX_REPORT_BYTES)?;
    let report: serde_json::Value =
      serde_json::from_slice(&body).context("parse X-Force report JSON")?;

    tracing::debug!(domain = %domain, bytes = body.len(), "X-Force report received");
    Ok(report)
  }
}

fn domain_url(base: &Url, domain: &str) -> anyhow::Result<Url> {
  let has_api_segment = base
    .path_segments()
    .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
    == Some("api");

  let mut url = base.clone();
  {
    let mut segs = url
      .path_segments_mut()
      .map_err(|_| anyhow::anyhow!("xforce_url cannot be used as a base URL"))?;
    segs.pop_if_empty();
    if !has_api_segment {
      segs.push("api");
    }
    segs.push("url").push(domain);
  }
  Ok(url)
}

/// X-Force uses HTTP basic auth. A `key:password` pair is encoded here, anything
/// else is taken as an already encoded token.
fn authorization_value(key: &str) -> String {
  let key = key.trim();
  if key.contains(':') {
    format!("Basic {}", STANDARD.encode(key.as_bytes()))
  } else {
    format!("Basic {key}")
  }
}

fn read_response_with_limit(response: Response, max_bytes: usize) -> anyhow::Result<Vec<u8>> {
  let mut out = Vec::new();
  let mut limited = response.take((max_bytes.saturating_add(1)) as u64);
  limited
    .read_to_end(&mut out)
    .context("read response body")?;

  if out.len() > max_bytes {
    anyhow::bail!("response exceeds max size {} bytes", max_bytes);
  }

  Ok(out)
}

fn safe_url_label(url: &Url) -> String {
  let host = url.host_str().unwrap_or("<no-host>");
  let mut path = url.path().to_string();
  if path.is_empty() {
    path = "/".to_string();
  }
  format!("{host}{path}")
}
