//! KIE API types

use crate::{ProviderTask, TaskStatus};
use serde::Deserialize;

/// Envelope shared by KIE job endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct KieEnvelope<T> {
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    pub task_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub state: String,
    /// JSON document encoded as a string, e.g. `{"resultUrls":["https://..."]}`
    pub result_json: Option<String>,
    pub fail_msg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultJson {
    #[serde(default)]
    result_urls: Vec<String>,
}

impl RecordInfo {
    pub fn status(&self) -> TaskStatus {
        match self.state.as_str() {
            "success" => TaskStatus::Succeeded,
            "fail" => TaskStatus::Failed,
            // waiting, queuing, generating
            _ => TaskStatus::Waiting,
        }
    }

    pub fn result_url(&self) -> Option<String> {
        let raw = self.result_json.as_deref()?;
        let parsed: ResultJson = serde_json::from_str(raw).ok()?;
        parsed.result_urls.into_iter().next()
    }

    pub fn into_task(self) -> ProviderTask {
        ProviderTask {
            status: self.status(),
            result_url: self.result_url(),
            id: self.task_id,
            model_name: self.model,
        }
    }
}
