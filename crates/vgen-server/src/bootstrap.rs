//! Wiring of configured provider clients into an orchestrator

use std::sync::Arc;
use vgen_core::config::VConfig;
use vgen_core::providers::gemini::GeminiConfig;
use vgen_core::providers::groq::GroqConfig;
use vgen_core::providers::{CloudinaryHost, GeminiCaptioner, GroqRefiner, KieGenerator};
use vgen_core::Result;
use vgen_orchestrator::{ModelSelection, Orchestrator};

pub fn build_orchestrator(config: &VConfig) -> Result<Orchestrator> {
    let mut gemini = GeminiCaptioner::builder()
        .with_config(GeminiConfig::from_settings(&config.gemini))
        .retry_policy(config.retry.policy());
    if let Some(key) = &config.gemini.api_key {
        gemini = gemini.api_key(key.clone());
    }

    let mut groq = GroqRefiner::builder().with_config(GroqConfig::from_settings(&config.groq));
    if let Some(key) = &config.groq.api_key {
        groq = groq.api_key(key.clone());
    }

    let mut kie = KieGenerator::builder().base_url(config.kie.base_url.clone());
    if let Some(key) = &config.kie.api_key {
        kie = kie.api_key(key.clone());
    }

    let mut builder = Orchestrator::builder()
        .captioner(Arc::new(gemini.build()?))
        .refiner(Arc::new(groq.build()?))
        .generator(Arc::new(kie.build()?))
        .models(ModelSelection::from_settings(&config.kie))
        .defaults(config.generation.clone());

    match CloudinaryHost::from_settings(&config.cloudinary) {
        Some(host) => builder = builder.image_host(Arc::new(host)),
        None => tracing::warn!("Cloudinary not configured; imageBase64 uploads are disabled"),
    }

    builder.build()
}
