use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_TAB_NAME: &str = "X-Force Report";
pub const ATTRIBUTE_FIELD_NAME: &str = "HTML report";

/// An indicator as handed over by the host. Only the fields the module reads are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ioc {
  pub ioc_id: i64,
  pub ioc_value: String,
  pub ioc_type: IocType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IocType {
  pub type_name: String,
}

impl Ioc {
  pub fn new(ioc_id: i64, type_name: &str, ioc_value: &str) -> Self {
    Self {
      ioc_id,
      ioc_value: ioc_value.to_string(),
      ioc_type: IocType {
        type_name: type_name.to_string(),
      },
    }
  }

  pub fn type_name(&self) -> &str {
    &self.ioc_type.type_name
  }

  /// IRIS has several domain flavoured types (`domain`, `domain|ip`, ...).
  pub fn is_domain(&self) -> bool {
    self.ioc_type.type_name.contains("domain")
  }

  pub fn domain_value(&self) -> anyhow::Result<&str> {
    let value = self.ioc_value.trim();
    if value.is_empty() {
      anyhow::bail!("IOC {} has an empty value", self.ioc_id);
    }
    if value.chars().any(char::is_whitespace) {
      anyhow::bail!("IOC {} value contains whitespace: {value:?}", self.ioc_id);
    }
    Ok(value)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
  Html,
}

/// A field the module asks the host to attach to an IOC, under a named tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeField {
  pub tab_name: String,
  pub field_name: String,
  pub field_type: FieldType,
  pub field_value: String,
}

impl AttributeField {
  pub fn html_report(rendered: String) -> Self {
    Self {
      tab_name: ATTRIBUTE_TAB_NAME.to_string(),
      field_name: ATTRIBUTE_FIELD_NAME.to_string(),
      field_type: FieldType::Html,
      field_value: rendered,
    }
  }
}
