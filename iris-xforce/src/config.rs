use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::template;

/// String that must never end up in logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn expose(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.trim().is_empty()
  }
}

impl fmt::Debug for SecretString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SecretString(<redacted>)")
  }
}

/// Per-module configuration, keyed by the IRIS parameter names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
  pub xforce_url: String,

  pub xforce_key: SecretString,

  #[serde(default = "default_true")]
  pub xforce_manual_hook_enabled: bool,

  #[serde(default)]
  pub xforce_on_create_hook_enabled: bool,

  #[serde(default)]
  pub xforce_on_update_hook_enabled: bool,

  #[serde(default = "default_true")]
  pub xforce_report_as_attribute: bool,

  #[serde(default = "default_domain_report_template")]
  pub xforce_domain_report_template: String,
}

impl ModuleConfig {
  pub fn new(url: &str, key: &str) -> Self {
    Self {
      xforce_url: url.to_string(),
      xforce_key: SecretString::new(key),
      xforce_manual_hook_enabled: true,
      xforce_on_create_hook_enabled: false,
      xforce_on_update_hook_enabled: false,
      xforce_report_as_attribute: true,
      xforce_domain_report_template: default_domain_report_template(),
    }
  }

  /// Builds the configuration from the mapping the host hands over on activation.
  pub fn from_host_value(value: serde_json::Value) -> anyhow::Result<Self> {
    let cfg: ModuleConfig =
      serde_json::from_value(value).context("parse module configuration")?;
    Ok(cfg)
  }

  pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
    toml::from_str(raw).context("parse module configuration TOML")
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    let url = reqwest::Url::parse(self.xforce_url.trim())
      .with_context(|| format!("invalid xforce_url: {}", self.xforce_url))?;
    if url.scheme() != "https" && url.scheme() != "http" {
      anyhow::bail!("xforce_url must use http or https");
    }
    if url.host_str().is_none() {
      anyhow::bail!("xforce_url has no host");
    }
    if self.xforce_key.is_empty() {
      anyhow::bail!("xforce_key must not be empty");
    }
    if self.xforce_report_as_attribute {
      template::check(&self.xforce_domain_report_template)
        .context("invalid xforce_domain_report_template")?;
    }
    Ok(())
  }

  pub fn hook_flags(&self) -> HookFlags {
    HookFlags {
      on_create: self.xforce_on_create_hook_enabled,
      on_update: self.xforce_on_update_hook_enabled,
      on_manual_trigger: self.xforce_manual_hook_enabled,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookFlags {
  pub on_create: bool,
  pub on_update: bool,
  pub on_manual_trigger: bool,
}

/// Host-wide settings this module reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub http_proxy: Option<String>,

  #[serde(default)]
  pub https_proxy: Option<String>,
}

impl ServerConfig {
  pub fn from_host_value(value: serde_json::Value) -> anyhow::Result<Self> {
    serde_json::from_value(value).context("parse server configuration")
  }

  pub fn http_proxy(&self) -> Option<&str> {
    non_blank(self.http_proxy.as_deref())
  }

  pub fn https_proxy(&self) -> Option<&str> {
    non_blank(self.https_proxy.as_deref())
  }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
  v.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default)]
  pub dir: Option<String>,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: None,
      retention_days: default_retention_days(),
    }
  }
}

/// Layout of the operator console's TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
  pub module: ModuleConfig,

  #[serde(default)]
  pub server: ServerConfig,

  #[serde(default)]
  pub logging: LoggingConfig,
}

pub fn load_console_config(path: &Path) -> anyhow::Result<ConsoleConfig> {
  let raw =
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
  let cfg: ConsoleConfig =
    toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
  Ok(cfg)
}

pub(crate) fn default_true() -> bool {
  true
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_retention_days() -> u64 {
  14
}

pub fn default_domain_report_template() -> String {
  DEFAULT_DOMAIN_REPORT_TEMPLATE.to_string()
}

pub const DEFAULT_DOMAIN_REPORT_TEMPLATE: &str = r##"<div class="row">
    <div class="col-12">
        <div class="accordion">
            <h3>X-Force Raw Results</h3>
            <div class="card">
                <div class="card-header collapsed" id="drop_r_xforce" data-toggle="collapse" data-target="#drop_raw_xforce" aria-expanded="false" aria-controls="drop_raw_xforce" role="button">
                    <div class="span-icon">
                        <div class="flaticon-file"></div>
                    </div>
                    <div class="span-title">
                        X-Force Raw Results
                    </div>
                    <div class="span-mode"></div>
                </div>
                <div id="drop_raw_xforce" class="collapse" aria-labelledby="drop_r_xforce" style="">
                    <div class="card-body">
                        <div id='xforce_raw_ace'>{{{tojson results indent=4}}}</div>
                    </div>
                </div>
            </div>
        </div>
    </div>
</div>
<script>
var xforce_in_raw = ace.edit("xforce_raw_ace", { autoScrollEditorIntoView: true, minLines: 30 });
xforce_in_raw.setReadOnly(true);
xforce_in_raw.setTheme("ace/theme/tomorrow");
xforce_in_raw.session.setMode("ace/mode/json");
xforce_in_raw.renderer.setShowGutter(true);
xforce_in_raw.setOption("showLineNumbers", true);
xforce_in_raw.setOption("showPrintMargin", false);
xforce_in_raw.setOption("displayIndentGuides", true);
xforce_in_raw.setOption("maxLines", "Infinity");
xforce_in_raw.session.setUseWrapMode(true);
xforce_in_raw.setOption("indentedSoftWrap", true);
xforce_in_raw.renderer.setScrollMargin(8, 5);
</script>"##;
