use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
  NoError,
  Error,
}

/// Result value handed back to the host: a status code, an optional message and
/// payload, and the log lines produced while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
  pub code: StatusCode,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub data: Option<serde_json::Value>,
  #[serde(default)]
  pub logs: Vec<String>,
}

impl Default for Outcome {
  fn default() -> Self {
    Self::success()
  }
}

impl Outcome {
  pub fn success() -> Self {
    Self {
      code: StatusCode::NoError,
      message: None,
      data: None,
      logs: Vec::new(),
    }
  }

  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      code: StatusCode::Error,
      message: Some(message.into()),
      data: None,
      logs: Vec::new(),
    }
  }

  pub fn with_data(mut self, data: serde_json::Value) -> Self {
    self.data = Some(data);
    self
  }

  pub fn with_logs(mut self, logs: Vec<String>) -> Self {
    self.logs = logs;
    self
  }

  pub fn is_success(&self) -> bool {
    self.code == StatusCode::NoError
  }

  pub fn is_failure(&self) -> bool {
    !self.is_success()
  }

  pub fn message(&self) -> &str {
    self.message.as_deref().unwrap_or("")
  }

  /// Combines two outcomes. The worse code wins, messages are joined with `"; "`,
  /// logs are concatenated and the right-hand payload replaces the left one when
  /// present. `Outcome::success()` is the identity and the operation is associative.
  pub fn merge(self, other: Outcome) -> Outcome {
    let message = match (self.message, other.message) {
      (Some(a), Some(b)) => Some(format!("{a}; {b}")),
      (a, b) => a.or(b),
    };
    let mut logs = self.logs;
    logs.extend(other.logs);

    Outcome {
      code: self.code.max(other.code),
      message,
      data: other.data.or(self.data),
      logs,
    }
  }
}

pub fn merge_all(outcomes: impl IntoIterator<Item = Outcome>) -> Outcome {
  outcomes
    .into_iter()
    .fold(Outcome::success(), Outcome::merge)
}
