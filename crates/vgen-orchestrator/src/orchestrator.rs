//! Provider chaining with fallback rules

use crate::stage::{RequestStage, StageTracker};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use vgen_core::config::{GenerationDefaults, KieSettings};
use vgen_core::{
    Captioner, CreateTaskRequest, DescriptionResult, Error, GenerationInput, GenerationParams,
    GenerationRequest, ImageHost, MediaGenerator, PromptRefiner, ProviderTask, Result,
    extract_task_id,
};
use vgen_telemetry::{ProviderKind, attributes, provider_span, safe_serialize};

/// Generation model identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub image_to_video: String,
    pub text_to_video: String,
    /// Tried once when the primary model reports unavailability
    pub fallback: String,
}

impl ModelSelection {
    pub fn from_settings(settings: &KieSettings) -> Self {
        Self {
            image_to_video: settings.image_to_video_model.clone(),
            text_to_video: settings.text_to_video_model.clone(),
            fallback: settings.fallback_model.clone(),
        }
    }

    pub fn primary(&self, has_image: bool) -> &str {
        if has_image {
            &self.image_to_video
        } else {
            &self.text_to_video
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::from_settings(&KieSettings::default())
    }
}

/// A created generation task plus the provider's raw createTask payload
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreation {
    pub task: ProviderTask,
    pub raw: Value,
}

/// Result of a full generation request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// No prompt was given; it was derived from the image
    ImageOnly {
        description: DescriptionResult,
        image_url: String,
        task: ProviderTask,
    },
    /// The client supplied the prompt
    Direct { task: ProviderTask, payload: Value },
}

impl GenerationOutcome {
    pub fn task(&self) -> &ProviderTask {
        match self {
            GenerationOutcome::ImageOnly { task, .. } => task,
            GenerationOutcome::Direct { task, .. } => task,
        }
    }
}

pub struct Orchestrator {
    captioner: Arc<dyn Captioner>,
    refiner: Arc<dyn PromptRefiner>,
    generator: Arc<dyn MediaGenerator>,
    image_host: Option<Arc<dyn ImageHost>>,
    models: ModelSelection,
    defaults: GenerationDefaults,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// Drive one request from `Received` to `TaskCreated` or `Failed`
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let mut stages = StageTracker::new();
        let result = self.run(&mut stages, request).await;

        match &result {
            Ok(outcome) => {
                tracing::Span::current().record(attributes::VGEN_TASK_ID, outcome.task().id.as_str());
                tracing::info!(task_id = %outcome.task().id, model = %outcome.task().model_name, "Generation task created");
            }
            Err(e) => {
                let at = stages.current();
                stages.fail();
                if e.is_validation() {
                    tracing::info!(stage = %at, "Rejected generation request: {}", e);
                } else {
                    tracing::error!(stage = %at, "Generation request failed: {}", e);
                }
            }
        }
        result
    }

    async fn run(&self, stages: &mut StageTracker, request: GenerationRequest) -> Result<GenerationOutcome> {
        let image_url = self.resolve_image(&request).await?;

        let params = GenerationParams {
            image_url: image_url.clone(),
            duration: request.duration,
            negative_prompt: request.negative_prompt,
            guidance_scale: request.guidance_scale,
            callback_url: request.callback_url,
        };

        match (request.prompt, image_url) {
            (Some(prompt), _) => {
                tracing::Span::current().record(attributes::VGEN_FLOW, "direct");
                stages.advance(RequestStage::PromptReady);
                stages.advance(RequestStage::TaskCreation);
                let creation = self.create_generation_task(&prompt, &params).await?;
                stages.advance(RequestStage::TaskCreated);
                Ok(GenerationOutcome::Direct {
                    task: creation.task,
                    payload: creation.raw,
                })
            }
            (None, Some(image_url)) => {
                tracing::Span::current().record(attributes::VGEN_FLOW, "image_only");
                stages.advance(RequestStage::PromptResolution);
                let description = self.resolve_prompt(&image_url).await?;
                stages.advance(RequestStage::PromptReady);
                stages.advance(RequestStage::TaskCreation);
                let creation = self.create_generation_task(&description.text, &params).await?;
                stages.advance(RequestStage::TaskCreated);
                Ok(GenerationOutcome::ImageOnly {
                    description,
                    image_url,
                    task: creation.task,
                })
            }
            (None, None) => Err(Error::validation(
                "A prompt or an image is required to generate media",
            )),
        }
    }

    /// Settle on a public HTTPS image URL, uploading inline data when needed
    async fn resolve_image(&self, request: &GenerationRequest) -> Result<Option<String>> {
        if let Some(url) = &request.image_url {
            ensure_https(url)?;
            return Ok(Some(url.clone()));
        }

        let Some(data_url) = &request.image_data else {
            return Ok(None);
        };

        let host = self.image_host.as_ref().ok_or_else(|| {
            Error::config_error(
                "Image hosting is not configured; send a public https image_url instead of imageBase64",
            )
        })?;

        let url = host
            .upload(data_url)
            .instrument(provider_span(ProviderKind::ImageHost, None))
            .await?;
        tracing::info!(image_url = %url, "Uploaded inline image");

        ensure_https(&url)?;
        Ok(Some(url))
    }

    /// Describe an image and refine the description into a generation prompt.
    ///
    /// Captioning failures are fatal. Refinement failures degrade to the caption.
    pub async fn resolve_prompt(&self, image_url: &str) -> Result<DescriptionResult> {
        let caption = self
            .captioner
            .describe(image_url)
            .instrument(provider_span(ProviderKind::Captioning, None))
            .await?;
        tracing::debug!(caption = %caption, "Image described");

        let refined = self
            .refiner
            .refine(&caption)
            .instrument(provider_span(ProviderKind::Refinement, None))
            .await;

        match refined {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                tracing::debug!(prompt = %text, "Prompt refined");
                Ok(DescriptionResult::from_refinement(caption, text))
            }
            Ok(_) => {
                tracing::warn!("Prompt refinement returned nothing, using caption verbatim");
                Ok(DescriptionResult::from_caption(caption))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prompt refinement failed, using caption verbatim");
                Ok(DescriptionResult::from_caption(caption))
            }
        }
    }

    /// Create a generation task, retrying once on the fallback model when the primary
    /// model reports a service-unavailable condition.
    pub async fn create_generation_task(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<TaskCreation> {
        let request = CreateTaskRequest {
            model: self.models.primary(params.image_url.is_some()).to_string(),
            callback_url: params.callback_url.clone(),
            input: self.build_input(prompt, params),
        };

        let (raw, model) = match self.submit(&request).await {
            Ok(raw) => (raw, request.model),
            Err(e) if e.is_unavailable() => {
                tracing::warn!(
                    primary = %request.model,
                    fallback = %self.models.fallback,
                    error = %e,
                    "createTask unavailable, retrying once with fallback model"
                );
                let fallback = CreateTaskRequest {
                    model: self.models.fallback.clone(),
                    ..request
                };
                match self.submit(&fallback).await {
                    Ok(raw) => (raw, fallback.model),
                    Err(e) => {
                        return Err(Error::GenerationUnavailable {
                            model: fallback.model,
                            source: Box::new(e),
                        });
                    }
                }
            }
            Err(e) => return Err(e),
        };

        let Some(task_id) = extract_task_id(&raw) else {
            return Err(Error::MalformedProviderResponse {
                raw: safe_serialize(&raw),
            });
        };

        Ok(TaskCreation {
            task: ProviderTask::waiting(task_id, model),
            raw,
        })
    }

    /// Current state of a generation task
    pub async fn task_status(&self, task_id: &str) -> Result<ProviderTask> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(Error::validation("taskId is required"));
        }

        self.generator
            .task_status(task_id)
            .instrument(provider_span(ProviderKind::TaskStatus, None))
            .await
    }

    async fn submit(&self, request: &CreateTaskRequest) -> Result<Value> {
        let span = provider_span(ProviderKind::Generation, Some(&request.model));
        let raw = self
            .generator
            .create_task(request)
            .instrument(span.clone())
            .await?;

        if let Some(task_id) = extract_task_id(&raw) {
            span.record(attributes::VGEN_TASK_ID, task_id.as_str());
        }
        Ok(raw)
    }

    fn build_input(&self, prompt: &str, params: &GenerationParams) -> GenerationInput {
        GenerationInput {
            prompt: prompt.to_string(),
            duration: params.duration,
            negative_prompt: params
                .negative_prompt
                .clone()
                .unwrap_or_else(|| self.defaults.negative_prompt.clone()),
            cfg_scale: params.guidance_scale.unwrap_or(self.defaults.cfg_scale),
            image_url: params.image_url.clone(),
        }
    }
}

fn ensure_https(url: &str) -> Result<()> {
    let is_https = url
        .get(..8)
        .map(|scheme| scheme.eq_ignore_ascii_case("https://"))
        .unwrap_or(false);

    if is_https {
        Ok(())
    } else {
        Err(Error::validation(
            "Only public HTTPS image URLs (starting with https://) are accepted. \
             Send a public image_url starting with https:// or send imageBase64 to upload.",
        ))
    }
}

pub struct OrchestratorBuilder {
    captioner: Option<Arc<dyn Captioner>>,
    refiner: Option<Arc<dyn PromptRefiner>>,
    generator: Option<Arc<dyn MediaGenerator>>,
    image_host: Option<Arc<dyn ImageHost>>,
    models: ModelSelection,
    defaults: GenerationDefaults,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            captioner: None,
            refiner: None,
            generator: None,
            image_host: None,
            models: ModelSelection::default(),
            defaults: GenerationDefaults::default(),
        }
    }

    pub fn captioner(mut self, captioner: Arc<dyn Captioner>) -> Self {
        self.captioner = Some(captioner);
        self
    }

    pub fn refiner(mut self, refiner: Arc<dyn PromptRefiner>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn MediaGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn image_host(mut self, image_host: Arc<dyn ImageHost>) -> Self {
        self.image_host = Some(image_host);
        self
    }

    pub fn models(mut self, models: ModelSelection) -> Self {
        self.models = models;
        self
    }

    pub fn defaults(mut self, defaults: GenerationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        Ok(Orchestrator {
            captioner: self
                .captioner
                .ok_or_else(|| Error::config_error("captioner is required"))?,
            refiner: self
                .refiner
                .ok_or_else(|| Error::config_error("refiner is required"))?,
            generator: self
                .generator
                .ok_or_else(|| Error::config_error("generator is required"))?,
            image_host: self.image_host,
            models: self.models,
            defaults: self.defaults,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vgen_core::providers::{MockCaptioner, MockImageHost, MockMediaGenerator, MockPromptRefiner};
    use vgen_core::{DescriptionSource, TaskStatus, VideoDuration};

    const I2V: &str = "kling/v2-5-turbo-image-to-video-pro";
    const T2V: &str = "kling/v2-5-turbo-text-to-video-pro";
    const FALLBACK: &str = "gemini-2.0-flash-lite";

    fn orchestrator(
        captioner: MockCaptioner,
        refiner: MockPromptRefiner,
        generator: MockMediaGenerator,
    ) -> Orchestrator {
        Orchestrator::builder()
            .captioner(Arc::new(captioner))
            .refiner(Arc::new(refiner))
            .generator(Arc::new(generator))
            .build()
            .unwrap()
    }

    fn unavailable() -> Error {
        Error::provider("kie", "createTask error 503: Service Unavailable")
    }

    fn image_request(url: &str) -> GenerationRequest {
        GenerationRequest {
            image_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_prompt_and_image_is_validation_error() {
        let orch = orchestrator(
            MockCaptioner::new(),
            MockPromptRefiner::new(),
            MockMediaGenerator::new(),
        );

        let err = orch.generate(GenerationRequest::default()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_plain_http_image_rejected_before_any_provider_call() {
        // Mocks without expectations panic if called
        let orch = orchestrator(
            MockCaptioner::new(),
            MockPromptRefiner::new(),
            MockMediaGenerator::new(),
        );

        let err = orch
            .generate(image_request("http://example.com/cat.png"))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let mut req = image_request("ftp://example.com/cat.png");
        req.prompt = Some("a cat".to_string());
        assert!(orch.generate(req).await.unwrap_err().is_validation());
    }

    #[test]
    fn test_uppercase_https_scheme_accepted() {
        assert!(ensure_https("HTTPS://example.com/a.png").is_ok());
        assert!(ensure_https("https:/").is_err());
    }

    #[tokio::test]
    async fn test_refinement_output_is_preferred() {
        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .withf(|url| url == "https://img.example.com/fox.jpg")
            .times(1)
            .returning(|_| Ok("A red fox standing in snow".to_string()));

        let mut refiner = MockPromptRefiner::new();
        refiner
            .expect_refine()
            .withf(|desc| desc == "A red fox standing in snow")
            .times(1)
            .returning(|_| Ok("  Slow dolly-in on a red fox in falling snow  ".to_string()));

        let orch = orchestrator(captioner, refiner, MockMediaGenerator::new());
        let result = orch.resolve_prompt("https://img.example.com/fox.jpg").await.unwrap();

        assert_eq!(result.text, "Slow dolly-in on a red fox in falling snow");
        assert_eq!(result.source, DescriptionSource::RefinementProvider);
        assert_eq!(result.caption, "A red fox standing in snow");
    }

    #[tokio::test]
    async fn test_refinement_failure_degrades_to_caption() {
        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .returning(|_| Ok("A lighthouse at dusk".to_string()));

        let mut refiner = MockPromptRefiner::new();
        refiner
            .expect_refine()
            .times(1)
            .returning(|_| Err(Error::provider("groq", "Groq API error 500: boom")));

        let orch = orchestrator(captioner, refiner, MockMediaGenerator::new());
        let result = orch.resolve_prompt("https://img.example.com/l.jpg").await.unwrap();

        assert_eq!(result.text, "A lighthouse at dusk");
        assert_eq!(result.source, DescriptionSource::CaptioningProvider);
        assert_eq!(result.refined, None);
    }

    #[tokio::test]
    async fn test_empty_refinement_degrades_to_caption() {
        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .returning(|_| Ok("A lighthouse at dusk".to_string()));

        let mut refiner = MockPromptRefiner::new();
        refiner.expect_refine().returning(|_| Ok("   ".to_string()));

        let orch = orchestrator(captioner, refiner, MockMediaGenerator::new());
        let result = orch.resolve_prompt("https://img.example.com/l.jpg").await.unwrap();
        assert_eq!(result.source, DescriptionSource::CaptioningProvider);
    }

    #[tokio::test]
    async fn test_captioning_failure_is_fatal() {
        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .returning(|_| Err(Error::provider("gemini", "Gemini API error 403: forbidden")));

        // Refiner and generator must never be reached
        let orch = orchestrator(captioner, MockPromptRefiner::new(), MockMediaGenerator::new());
        let err = orch
            .generate(image_request("https://img.example.com/x.jpg"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("forbidden"));
    }

    #[tokio::test]
    async fn test_image_only_flow_creates_image_to_video_task() {
        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .returning(|_| Ok("A sailboat on a calm lake".to_string()));

        let mut refiner = MockPromptRefiner::new();
        refiner
            .expect_refine()
            .returning(|_| Ok("Aerial orbit around a sailboat".to_string()));

        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .withf(|req| {
                req.model == I2V
                    && req.input.prompt == "Aerial orbit around a sailboat"
                    && req.input.image_url.as_deref() == Some("https://img.example.com/boat.jpg")
                    && req.input.duration == VideoDuration::Ten
                    && req.input.negative_prompt == "blur, distort, and low quality"
                    && req.input.cfg_scale == 0.3
            })
            .times(1)
            .returning(|_| Ok(json!({"code": 200, "data": {"taskId": "task-boat"}})));

        let orch = orchestrator(captioner, refiner, generator);
        let outcome = orch
            .generate(image_request("https://img.example.com/boat.jpg"))
            .await
            .unwrap();

        match outcome {
            GenerationOutcome::ImageOnly {
                description,
                image_url,
                task,
            } => {
                assert_eq!(description.caption, "A sailboat on a calm lake");
                assert_eq!(image_url, "https://img.example.com/boat.jpg");
                assert_eq!(task.id, "task-boat");
                assert_eq!(task.model_name, I2V);
                assert_eq!(task.status, TaskStatus::Waiting);
            }
            other => panic!("expected image-only outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_direct_prompt_returns_raw_payload() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .withf(|req| {
                req.model == T2V
                    && req.input.image_url.is_none()
                    && req.input.duration == VideoDuration::Five
                    && req.input.negative_prompt == "text, watermark"
                    && req.input.cfg_scale == 0.7
                    && req.callback_url.as_deref() == Some("https://hooks.example.com/done")
            })
            .times(1)
            .returning(|_| Ok(json!({"code": 200, "msg": "success", "data": {"taskId": "t-42"}})));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let outcome = orch
            .generate(GenerationRequest {
                prompt: Some("a neon city in rain".to_string()),
                duration: VideoDuration::Five,
                negative_prompt: Some("text, watermark".to_string()),
                guidance_scale: Some(0.7),
                callback_url: Some("https://hooks.example.com/done".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        match outcome {
            GenerationOutcome::Direct { task, payload } => {
                assert_eq!(task.id, "t-42");
                assert_eq!(payload["msg"], "success");
            }
            other => panic!("expected direct outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_with_image_uses_image_model_without_captioning() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .withf(|req| req.model == I2V && req.input.prompt == "make it snow")
            .times(1)
            .returning(|_| Ok(json!({"taskId": "t-1"})));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let mut req = image_request("https://img.example.com/house.jpg");
        req.prompt = Some("make it snow".to_string());

        let outcome = orch.generate(req).await.unwrap();
        assert_eq!(outcome.task().id, "t-1");
    }

    #[tokio::test]
    async fn test_unavailable_primary_falls_back_once() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .withf(|req| req.model == T2V)
            .times(1)
            .returning(|_| Err(unavailable()));
        generator
            .expect_create_task()
            .withf(|req| req.model == FALLBACK && req.input.prompt == "waves")
            .times(1)
            .returning(|_| Ok(json!({"data": {"id": "fallback-task"}})));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let creation = orch
            .create_generation_task("waves", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(creation.task.id, "fallback-task");
        assert_eq!(creation.task.model_name, FALLBACK);
    }

    #[tokio::test]
    async fn test_fallback_failure_reports_fallback_error() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .withf(|req| req.model == T2V)
            .times(1)
            .returning(|_| Err(unavailable()));
        generator
            .expect_create_task()
            .withf(|req| req.model == FALLBACK)
            .times(1)
            .returning(|_| Err(Error::provider("kie", "createTask error 422: model not supported")));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let err = orch
            .create_generation_task("waves", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::GenerationUnavailable { .. }));
        let msg = err.to_string();
        assert!(msg.contains("model not supported"));
        assert!(!msg.contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_non_unavailable_error_is_not_retried() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .times(1)
            .returning(|_| Err(Error::provider("kie", "createTask error 401: unauthorized")));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let err = orch
            .create_generation_task("waves", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider { .. }));
    }

    #[tokio::test]
    async fn test_missing_task_id_is_malformed_response() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .returning(|_| Ok(json!({"code": 200, "msg": "ok", "data": {}})));

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let err = orch
            .create_generation_task("waves", &GenerationParams::default())
            .await
            .unwrap_err();

        match err {
            Error::MalformedProviderResponse { raw } => assert!(raw.contains("\"msg\":\"ok\"")),
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identical_direct_requests_create_independent_tasks() {
        let mut generator = MockMediaGenerator::new();
        let mut counter = 0;
        generator.expect_create_task().times(2).returning(move |_| {
            counter += 1;
            Ok(json!({"taskId": format!("task-{}", counter)}))
        });

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let first = orch.generate(GenerationRequest::text_prompt("dunes")).await.unwrap();
        let second = orch.generate(GenerationRequest::text_prompt("dunes")).await.unwrap();

        assert_eq!(first.task().id, "task-1");
        assert_eq!(second.task().id, "task-2");
    }

    #[tokio::test]
    async fn test_inline_image_is_uploaded_then_described() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .withf(|data| data.starts_with("data:image/png;base64,"))
            .times(1)
            .returning(|_| Ok("https://res.cloudinary.com/demo/image/upload/x.png".to_string()));

        let mut captioner = MockCaptioner::new();
        captioner
            .expect_describe()
            .withf(|url| url == "https://res.cloudinary.com/demo/image/upload/x.png")
            .returning(|_| Ok("A mountain".to_string()));

        let mut refiner = MockPromptRefiner::new();
        refiner
            .expect_refine()
            .returning(|_| Err(Error::provider("groq", "down")));

        let mut generator = MockMediaGenerator::new();
        generator
            .expect_create_task()
            .returning(|_| Ok(json!({"data": {"taskId": "t-mtn"}})));

        let orch = Orchestrator::builder()
            .captioner(Arc::new(captioner))
            .refiner(Arc::new(refiner))
            .generator(Arc::new(generator))
            .image_host(Arc::new(host))
            .build()
            .unwrap();

        let outcome = orch
            .generate(GenerationRequest {
                image_data: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.task().id, "t-mtn");
    }

    fn hosted(host: MockImageHost) -> Orchestrator {
        // Captioner and generator carry no expectations and panic if reached
        Orchestrator::builder()
            .captioner(Arc::new(MockCaptioner::new()))
            .refiner(Arc::new(MockPromptRefiner::new()))
            .generator(Arc::new(MockMediaGenerator::new()))
            .image_host(Arc::new(host))
            .build()
            .unwrap()
    }

    fn inline_request() -> GenerationRequest {
        GenerationRequest {
            image_data: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_inline_upload_failure_is_provider_error() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .times(1)
            .returning(|_| Err(Error::provider("cloudinary", "Upload failed 400 Bad Request: Invalid image file")));

        let err = hosted(host).generate(inline_request()).await.unwrap_err();
        assert!(matches!(err, Error::Provider { provider: "cloudinary", .. }));
        assert!(err.to_string().contains("Invalid image file"));
    }

    #[tokio::test]
    async fn test_inline_upload_returning_plain_http_is_rejected() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .times(1)
            .returning(|_| Ok("http://res.cloudinary.com/demo/image/upload/x.png".to_string()));

        let err = hosted(host).generate(inline_request()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_inline_image_without_host_is_config_error() {
        let orch = orchestrator(
            MockCaptioner::new(),
            MockPromptRefiner::new(),
            MockMediaGenerator::new(),
        );

        let err = orch
            .generate(GenerationRequest {
                image_data: Some("data:image/png;base64,AAAA".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_task_status_delegates() {
        let mut generator = MockMediaGenerator::new();
        generator
            .expect_task_status()
            .withf(|id| id == "t-9")
            .returning(|id| {
                Ok(ProviderTask {
                    id: id.to_string(),
                    model_name: T2V.to_string(),
                    status: TaskStatus::Succeeded,
                    result_url: Some("https://cdn.example.com/t-9.mp4".to_string()),
                })
            });

        let orch = orchestrator(MockCaptioner::new(), MockPromptRefiner::new(), generator);
        let task = orch.task_status(" t-9 ").await.unwrap();
        assert!(task.is_terminal());

        assert!(orch.task_status("  ").await.unwrap_err().is_validation());
    }

    #[test]
    fn test_builder_requires_providers() {
        let result = Orchestrator::builder().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
