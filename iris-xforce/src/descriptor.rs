//! What the module declares to IRIS: identity and configuration parameters.

use serde::Serialize;
use serde_json::json;

use crate::config::DEFAULT_DOMAIN_REPORT_TEMPLATE;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
  pub module_name: &'static str,
  pub module_description: &'static str,
  pub interface_version: &'static str,
  pub module_version: &'static str,
  pub module_type: &'static str,
  pub pipeline_support: bool,
  pub pipeline_info: serde_json::Value,
}

pub fn module_info() -> ModuleInfo {
  ModuleInfo {
    module_name: "IrisXforce",
    module_description: "A module that integrates IBM X-Force Exchange for retrieving domain and IP threat intelligence reports in the IrisDFIR platform.",
    interface_version: "1.1",
    module_version: "1.0",
    module_type: "module_processor",
    pipeline_support: false,
    pipeline_info: json!({}),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
  String,
  SensitiveString,
  Bool,
  TextfieldHtml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
  Triggers,
  Insights,
  Templates,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigParam {
  pub param_name: &'static str,
  pub param_human_name: &'static str,
  pub param_description: &'static str,
  pub default: serde_json::Value,
  pub mandatory: bool,
  #[serde(rename = "type")]
  pub param_type: ParamType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub section: Option<Section>,
}

pub fn module_configuration() -> Vec<ConfigParam> {
  vec![
    ConfigParam {
      param_name: "xforce_url",
      param_human_name: "X-Force API URL",
      param_description: "The base URL for IBM X-Force API, e.g., 'https://api.xforce.ibmcloud.com'",
      default: serde_json::Value::Null,
      mandatory: true,
      param_type: ParamType::String,
      section: None,
    },
    ConfigParam {
      param_name: "xforce_key",
      param_human_name: "X-Force API Key",
      param_description: "The API key for accessing IBM X-Force Exchange.",
      default: serde_json::Value::Null,
      mandatory: true,
      param_type: ParamType::SensitiveString,
      section: None,
    },
    ConfigParam {
      param_name: "xforce_manual_hook_enabled",
      param_human_name: "Manual Triggers on IOCs",
      param_description: "Set to True to allow manually triggering the module via the UI.",
      default: json!(true),
      mandatory: true,
      param_type: ParamType::Bool,
      section: Some(Section::Triggers),
    },
    ConfigParam {
      param_name: "xforce_on_create_hook_enabled",
      param_human_name: "Automatic Trigger on IOC Creation",
      param_description: "Set to True to automatically add X-Force insight each time an IOC is created.",
      default: json!(false),
      mandatory: true,
      param_type: ParamType::Bool,
      section: Some(Section::Triggers),
    },
    ConfigParam {
      param_name: "xforce_on_update_hook_enabled",
      param_human_name: "Automatic Trigger on IOC Update",
      param_description: "Set to True to automatically add X-Force insight each time an IOC is updated.",
      default: json!(false),
      mandatory: true,
      param_type: ParamType::Bool,
      section: Some(Section::Triggers),
    },
    ConfigParam {
      param_name: "xforce_report_as_attribute",
      param_human_name: "Add X-Force Report as New IOC Attribute",
      param_description: "Creates a new attribute on the IOC based on the X-Force report using the template specified below.",
      default: json!(true),
      mandatory: true,
      param_type: ParamType::Bool,
      section: Some(Section::Insights),
    },
    ConfigParam {
      param_name: "xforce_domain_report_template",
      param_human_name: "Domain Report Template",
      param_description: "HTML template for generating the domain report as a custom attribute on the IOC.",
      default: json!(DEFAULT_DOMAIN_REPORT_TEMPLATE),
      mandatory: false,
      param_type: ParamType::TextfieldHtml,
      section: Some(Section::Templates),
    },
  ]
}
