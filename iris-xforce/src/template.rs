//! Rendering of X-Force reports into the HTML shown on the IOC.
//!
//! Templates are Handlebars in strict mode: referencing a value that is not in the
//! report is an error rather than an empty string. Interpolated values are written
//! as-is, without HTML escaping. The report is exposed as `results`. A `tojson` helper serializes a value, optionally pretty-printed:
//!
//! ```text
//! <pre>{{{tojson results indent=4}}}</pre>
//! ```

use handlebars::{
  Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("template syntax error: {0}")]
  Syntax(String),
  #[error("{0}")]
  Render(String),
}

/// Renders `template` with `{"results": data}` as context.
pub fn render(template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
  let hb = registry();
  hb.render_template(template, &json!({ "results": data }))
    .map_err(|e| RenderError::Render(e.to_string()))
}

/// Compiles `template` without rendering it.
pub fn check(template: &str) -> Result<(), RenderError> {
  handlebars::Template::compile(template)
    .map(|_| ())
    .map_err(|e| RenderError::Syntax(e.to_string()))
}

fn registry() -> Handlebars<'static> {
  let mut hb = Handlebars::new();
  hb.set_strict_mode(true);
  hb.register_escape_fn(handlebars::no_escape);
  hb.register_helper("tojson", Box::new(tojson_helper));
  hb
}

fn tojson_helper(
  h: &Helper,
  _: &Handlebars,
  _: &Context,
  _: &mut RenderContext,
  out: &mut dyn Output,
) -> HelperResult {
  let value = h
    .param(0)
    .ok_or(RenderErrorReason::ParamNotFoundForIndex("tojson", 0))?
    .value();

  let indent = match h.hash_get("indent") {
    Some(v) => Some(v.value().as_u64().ok_or_else(|| {
      RenderErrorReason::Other("tojson: indent must be a non-negative integer".to_string())
    })?),
    None => None,
  };

  let serialized = to_json(value, indent)
    .map_err(|e| RenderErrorReason::Other(format!("tojson: {e}")))?;
  out.write(&html_safe_json(&serialized))?;
  Ok(())
}

pub fn to_json(value: &serde_json::Value, indent: Option<u64>) -> serde_json::Result<String> {
  let Some(width) = indent else {
    return serde_json::to_string(value);
  };

  let pad = " ".repeat(width as usize);
  let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
  let mut buf = Vec::new();
  let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
  serde::Serialize::serialize(value, &mut ser)?;
  // serde_json only ever writes UTF-8.
  Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Escapes the characters that would let JSON break out of an HTML context.
fn html_safe_json(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '<' => out.push_str("\\u003c"),
      '>' => out.push_str("\\u003e"),
      '&' => out.push_str("\\u0026"),
      '\'' => out.push_str("\\u0027"),
      _ => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DEFAULT_DOMAIN_REPORT_TEMPLATE;

  #[test]
  fn interpolates_report_fields() {
    let out = render("<p>{{ results.score }}</p>", &json!({"score": 1})).unwrap();
    assert_eq!(out, "<p>1</p>");
  }

  #[test]
  fn interpolation_is_not_html_escaped() {
    let report = json!({"url": "http://x/?a=1&b=2", "owner": "O'Brien <x>"});
    let out = render("{{ results.url }}|{{ results.owner }}", &report).unwrap();
    assert_eq!(out, "http://x/?a=1&b=2|O'Brien <x>");
  }

  #[test]
  fn null_renders_as_empty_text() {
    let out = render("[{{ results.registrar }}]", &json!({"registrar": null})).unwrap();
    assert_eq!(out, "[]");
  }

  #[test]
  fn tojson_embeds_exact_serialization() {
    let report = json!({"score": 3, "cats": ["malware"]});
    let template = "<div>{{{tojson results}}}</div>";

    let first = render(template, &report).unwrap();
    let expected = format!("<div>{}</div>", serde_json::to_string(&report).unwrap());
    assert_eq!(first, expected);

    let second = render(template, &report).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn tojson_indent_pretty_prints() {
    let out = render("{{{tojson results indent=2}}}", &json!({"a": [1]})).unwrap();
    assert_eq!(out, "{\n  \"a\": [\n    1\n  ]\n}");
  }

  #[test]
  fn tojson_escapes_html_breakouts() {
    let out = render(
      "{{{tojson results}}}",
      &json!({"x": "</div><script>alert('x')</script>&"}),
    )
    .unwrap();
    assert!(!out.contains('<'));
    assert!(!out.contains('\''));
    assert!(out.contains("\\u003c/div\\u003e"));
    assert!(out.contains("\\u0026"));
  }

  #[test]
  fn undefined_variable_is_an_error() {
    let err = render("<p>{{ results.missing.field }}</p>", &json!({"score": 1})).unwrap_err();
    assert!(matches!(err, RenderError::Render(_)));

    let err = render("<p>{{ nothing }}</p>", &json!({"score": 1})).unwrap_err();
    assert!(matches!(err, RenderError::Render(_)));
  }

  #[test]
  fn unknown_helper_is_an_error() {
    assert!(render("{{ nosuchfilter results }}", &json!({})).is_err());
  }

  #[test]
  fn bad_indent_is_an_error() {
    assert!(render("{{{tojson results indent=\"wide\"}}}", &json!({})).is_err());
  }

  #[test]
  fn syntax_errors_are_reported_by_check_and_render() {
    let broken = "{{#each results}}never closed";
    assert!(matches!(check(broken), Err(RenderError::Syntax(_))));
    assert!(render(broken, &json!([])).is_err());
  }

  #[test]
  fn default_template_renders_raw_results() {
    check(DEFAULT_DOMAIN_REPORT_TEMPLATE).unwrap();
    let report = json!({"result": {"score": 1, "url": "example.com"}});
    let out = render(DEFAULT_DOMAIN_REPORT_TEMPLATE, &report).unwrap();
    assert!(out.contains("<div id='xforce_raw_ace'>{\n    \"result\": {"));
    assert!(out.contains("ace.edit(\"xforce_raw_ace\""));
  }
}
