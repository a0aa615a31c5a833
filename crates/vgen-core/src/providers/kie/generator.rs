//! KIE generator implementation

use super::{KieConfig, types::*};
use crate::{
    CreateTaskRequest, Error, ProviderTask, Result,
    providers::{MediaGenerator, error_from_response},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "kie";

pub struct KieGenerator {
    client: Client,
    api_key: String,
    config: KieConfig,
}

impl KieGenerator {
    pub fn new(api_key: String, config: KieConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    pub fn builder() -> super::KieBuilder {
        super::KieBuilder::new()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/jobs/{}", self.config.base_url, path)
    }
}

/// KIE reports failures inside a 200 body; anything but `code: 200` is an error
fn check_envelope_code(context: &str, body: &Value) -> Result<()> {
    match body.get("code").and_then(Value::as_i64) {
        Some(200) | None => Ok(()),
        Some(code) => {
            let msg = body.get("msg").and_then(Value::as_str).unwrap_or("unknown error");
            Err(Error::provider(PROVIDER, format!("{} {}: {}", context, code, msg)))
        }
    }
}

#[async_trait]
impl MediaGenerator for KieGenerator {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Value> {
        let response = self
            .client
            .post(self.url("createTask"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("createTask request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, "createTask error", response).await);
        }

        let body: Value = response.json().await.map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse createTask response: {}", e))
        })?;

        check_envelope_code("createTask error", &body)?;
        Ok(body)
    }

    async fn task_status(&self, task_id: &str) -> Result<ProviderTask> {
        let response = self
            .client
            .get(self.url("recordInfo"))
            .query(&[("taskId", task_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("recordInfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, "recordInfo error", response).await);
        }

        let body: Value = response.json().await.map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse recordInfo response: {}", e))
        })?;
        check_envelope_code("recordInfo error", &body)?;

        let envelope: KieEnvelope<RecordInfo> = serde_json::from_value(body)?;
        let info = envelope
            .data
            .ok_or_else(|| Error::provider(PROVIDER, format!("No record for task {}", task_id)))?;

        if let Some(reason) = info.fail_msg.as_deref().filter(|m| !m.is_empty()) {
            tracing::warn!(task_id, "Generation task failed: {}", reason);
        }
        Ok(info.into_task())
    }
}
