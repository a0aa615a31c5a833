use serde::{Deserialize, Serialize};
use serde_json::Value;
use vgen_core::{DescriptionSource, TaskStatus};
use vgen_orchestrator::GenerationOutcome;

/// Response for the image-only flow: the derived prompt plus a task to poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFlowResponse {
    pub description: String,
    #[serde(rename = "groqOutput", skip_serializing_if = "Option::is_none")]
    pub groq_output: Option<String>,
    pub image_url: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    pub state: TaskStatus,
    #[serde(rename = "promptSource")]
    pub prompt_source: DescriptionSource,
}

/// JSON body returned by `POST /generate`
pub fn generate_response_body(outcome: GenerationOutcome) -> vgen_core::Result<Value> {
    match outcome {
        GenerationOutcome::ImageOnly {
            description,
            image_url,
            task,
        } => {
            let body = ImageFlowResponse {
                description: description.caption,
                groq_output: description.refined,
                image_url,
                task_id: task.id,
                state: task.status,
                prompt_source: description.source,
            };
            Ok(serde_json::to_value(body)?)
        }
        // The provider's createTask payload is passed through untouched
        GenerationOutcome::Direct { payload, .. } => Ok(payload),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgen_core::{DescriptionResult, ProviderTask};

    #[test]
    fn test_image_flow_body() {
        let outcome = GenerationOutcome::ImageOnly {
            description: DescriptionResult::from_refinement(
                "A cat".to_string(),
                "A cat leaps".to_string(),
            ),
            image_url: "https://img.example.com/cat.jpg".to_string(),
            task: ProviderTask::waiting("t-1", "kling"),
        };

        let body = generate_response_body(outcome).unwrap();
        assert_eq!(body["description"], "A cat");
        assert_eq!(body["groqOutput"], "A cat leaps");
        assert_eq!(body["taskId"], "t-1");
        assert_eq!(body["state"], "waiting");
        assert_eq!(body["promptSource"], "refinement-provider");
    }

    #[test]
    fn test_image_flow_body_without_refinement() {
        let outcome = GenerationOutcome::ImageOnly {
            description: DescriptionResult::from_caption("A cat".to_string()),
            image_url: "https://img.example.com/cat.jpg".to_string(),
            task: ProviderTask::waiting("t-1", "kling"),
        };

        let body = generate_response_body(outcome).unwrap();
        assert!(body.get("groqOutput").is_none());
        assert_eq!(body["promptSource"], "captioning-provider");
    }

    #[test]
    fn test_direct_body_is_provider_payload() {
        let payload = serde_json::json!({"code": 200, "data": {"taskId": "t-2"}});
        let outcome = GenerationOutcome::Direct {
            task: ProviderTask::waiting("t-2", "kling"),
            payload: payload.clone(),
        };
        assert_eq!(generate_response_body(outcome).unwrap(), payload);
    }
}
