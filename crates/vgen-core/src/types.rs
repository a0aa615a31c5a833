//! Request, task and description types shared by the orchestrator and the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Clip length accepted by the generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoDuration {
    #[serde(rename = "5")]
    Five,
    #[default]
    #[serde(rename = "10")]
    Ten,
}

impl VideoDuration {
    /// Only the literal string `"5"` selects the short clip; anything else is ten seconds.
    pub fn from_wire(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("5") => VideoDuration::Five,
            _ => VideoDuration::Ten,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoDuration::Five => "5",
            VideoDuration::Ten => "10",
        }
    }
}

/// Inbound generation request, already normalised from the wire body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
    /// Public image URL supplied by the client
    pub image_url: Option<String>,
    /// Inline `data:image/...;base64,...` payload that still needs hosting
    pub image_data: Option<String>,
    pub duration: VideoDuration,
    pub negative_prompt: Option<String>,
    pub guidance_scale: Option<f64>,
    pub callback_url: Option<String>,
}

impl GenerationRequest {
    /// Build a request from a JSON body, ignoring fields of the wrong type.
    pub fn from_json(body: &Value) -> Self {
        let non_empty = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let string = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            prompt: non_empty("prompt"),
            image_url: non_empty("image_url"),
            image_data: string("imageBase64").filter(|data| data.starts_with("data:image/")),
            duration: VideoDuration::from_wire(body.get("duration")),
            negative_prompt: string("negative_prompt"),
            guidance_scale: body.get("cfg_scale").and_then(Value::as_f64),
            callback_url: string("callBackUrl"),
        }
    }

    pub fn text_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some() || self.image_data.is_some()
    }
}

/// Optional knobs forwarded to the generation provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub image_url: Option<String>,
    pub duration: VideoDuration,
    pub negative_prompt: Option<String>,
    pub guidance_scale: Option<f64>,
    pub callback_url: Option<String>,
}

/// `input` object of a createTask call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    pub prompt: String,
    pub duration: VideoDuration,
    pub negative_prompt: String,
    pub cfg_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub model: String,
    #[serde(rename = "callBackUrl", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub input: GenerationInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Waiting,
    Succeeded,
    Failed,
}

/// A generation job held by the media provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTask {
    #[serde(rename = "taskId")]
    pub id: String,
    #[serde(rename = "model")]
    pub model_name: String,
    #[serde(rename = "state")]
    pub status: TaskStatus,
    #[serde(rename = "resultUrl", skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
}

impl ProviderTask {
    pub fn waiting(id: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
            status: TaskStatus::Waiting,
            result_url: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != TaskStatus::Waiting
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptionSource {
    CaptioningProvider,
    RefinementProvider,
}

/// Prompt produced from an image, with the provider that produced the final text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionResult {
    pub text: String,
    pub source: DescriptionSource,
    /// Raw captioning output
    pub caption: String,
    /// Refinement output, absent when refinement failed or came back empty
    pub refined: Option<String>,
}

impl DescriptionResult {
    pub fn from_caption(caption: String) -> Self {
        Self {
            text: caption.clone(),
            source: DescriptionSource::CaptioningProvider,
            caption,
            refined: None,
        }
    }

    pub fn from_refinement(caption: String, refined: String) -> Self {
        Self {
            text: refined.clone(),
            source: DescriptionSource::RefinementProvider,
            caption,
            refined: Some(refined),
        }
    }
}
