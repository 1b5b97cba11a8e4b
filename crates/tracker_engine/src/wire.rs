//! JSON shapes of the analysis service's submit and status endpoints.
//!
//! Both snake_case and camelCase field names are accepted.

use serde::Deserialize;
use serde_json::Value;
use tracker_core::{JobHandle, StatusLine, StatusSnapshot};

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(alias = "analysisId")]
    pub analysis_id: String,
}

impl SubmitResponse {
    pub(crate) fn into_handle(self) -> JobHandle {
        JobHandle::new(self.analysis_id)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StatusResponse {
    pub status: Option<WireStatus>,
    #[serde(alias = "logMessages")]
    pub log_messages: Option<Vec<String>>,
    pub error: Option<String>,
    pub complete: Option<bool>,
    pub success: Option<bool>,
    pub result: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireStatus {
    pub progress: Value,
    pub message: Option<String>,
    #[serde(alias = "stepName")]
    pub step_name: Option<String>,
    pub step: Option<i64>,
}

impl StatusResponse {
    pub(crate) fn into_snapshot(self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status.map(WireStatus::into_line),
            log_messages: self.log_messages.unwrap_or_default(),
            error_text: self.error.filter(|text| !text.is_empty()),
            is_complete: self.complete.unwrap_or(false),
            is_success: self.success.unwrap_or(false),
            result: self.result.filter(|value| !value.is_null()),
        }
    }
}

impl WireStatus {
    fn into_line(self) -> StatusLine {
        StatusLine {
            progress_percent: progress_value(&self.progress),
            step_name: self.step_name,
            step: self.step,
            message: self.message.unwrap_or_default(),
        }
    }
}

/// Integer percent from a number or numeric string; anything else reads as 0.
fn progress_value(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.round() as i64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse::<f64>().map(|f| f.round() as i64).unwrap_or(0),
        _ => 0,
    }
}
