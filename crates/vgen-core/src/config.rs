//! Configuration management for vgen
//!
//! Loads configuration with priority:
//! 1. Specified config file
//! 2. config.toml in current directory or a parent
//! 3. Environment variables (fallback for keys)
//! 4. Defaults

use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// vgen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Image captioning provider
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Prompt refinement provider
    #[serde(default)]
    pub groq: GroqSettings,

    /// Media generation provider
    #[serde(default)]
    pub kie: KieSettings,

    /// Image hosting for inline uploads
    #[serde(default)]
    pub cloudinary: CloudinarySettings,

    #[serde(default)]
    pub generation: GenerationDefaults,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for request bodies (inline images travel as base64)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API key (can reference env var with ${VAR_NAME})
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Instruction sent alongside the image
    #[serde(default = "default_caption_prompt")]
    pub caption_prompt: String,

    #[serde(default = "default_caption_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqSettings {
    pub api_key: Option<String>,

    #[serde(default = "default_groq_model")]
    pub model: String,

    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    #[serde(default = "default_refine_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KieSettings {
    pub api_key: Option<String>,

    #[serde(default = "default_kie_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_to_video_model")]
    pub image_to_video_model: String,

    #[serde(default = "default_text_to_video_model")]
    pub text_to_video_model: String,

    /// Alternate model used once when the primary reports unavailability
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudinarySettings {
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
    pub folder: Option<String>,
}

/// Values applied when the client leaves a generation knob unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationDefaults {
    #[serde(default = "default_negative_prompt")]
    pub negative_prompt: String,

    #[serde(default = "default_cfg_scale")]
    pub cfg_scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

/// Observability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub service_name: Option<String>,

    /// JSON log lines instead of text
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            caption_prompt: default_caption_prompt(),
            temperature: default_caption_temperature(),
        }
    }
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_groq_model(),
            base_url: default_groq_base_url(),
            system_prompt: default_refine_prompt(),
        }
    }
}

impl Default for KieSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_kie_base_url(),
            image_to_video_model: default_image_to_video_model(),
            text_to_video_model: default_text_to_video_model(),
            fallback_model: default_fallback_model(),
        }
    }
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            negative_prompt: default_negative_prompt(),
            cfg_scale: default_cfg_scale(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl VConfig {
    /// Load configuration from config.toml, falling back to environment-only defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config.toml found, using environment and defaults");
                Self::from_env()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from: {:?}", path);

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.resolve_env_vars();
        Ok(config)
    }

    /// Parse TOML without touching the environment
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Defaults with keys taken from the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.resolve_env_vars();
        Ok(config)
    }

    /// Find config.toml by searching current directory and parents
    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references and fill missing keys from well-known variables
    fn resolve_env_vars(&mut self) {
        self.gemini.api_key = Self::resolve_key(
            self.gemini.api_key.take(),
            &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        );
        self.groq.api_key = Self::resolve_key(self.groq.api_key.take(), &["GROQ_API_KEY"]);
        self.kie.api_key = Self::resolve_key(self.kie.api_key.take(), &["KIE_API_KEY"]);
        self.cloudinary.cloud_name = Self::resolve_key(
            self.cloudinary.cloud_name.take(),
            &["CLOUDINARY_CLOUD_NAME"],
        );
        self.cloudinary.upload_preset = Self::resolve_key(
            self.cloudinary.upload_preset.take(),
            &["CLOUDINARY_UPLOAD_PRESET"],
        );
    }

    fn resolve_key(value: Option<String>, fallbacks: &[&str]) -> Option<String> {
        value
            .and_then(|v| Self::resolve_env_var(&v))
            .filter(|v| !v.is_empty())
            .or_else(|| {
                fallbacks
                    .iter()
                    .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))
            })
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    /// Listen address for the HTTP server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Create test-friendly defaults (no real keys, fast retries)
    pub fn test_defaults() -> Self {
        Self {
            gemini: GeminiSettings {
                api_key: Some("test-gemini-key".to_string()),
                ..Default::default()
            },
            groq: GroqSettings {
                api_key: Some("test-groq-key".to_string()),
                ..Default::default()
            },
            kie: KieSettings {
                api_key: Some("test-kie-key".to_string()),
                ..Default::default()
            },
            cloudinary: CloudinarySettings {
                cloud_name: Some("test-cloud".to_string()),
                upload_preset: Some("unsigned".to_string()),
                folder: None,
            },
            retry: RetrySettings {
                max_attempts: 3,
                base_delay_ms: 1,
            },
            ..Default::default()
        }
    }
}

/// Require an optional key, naming the section and variable in the error
pub fn require_key(value: &Option<String>, section: &str, env_var: &str) -> crate::Result<String> {
    value.clone().ok_or_else(|| {
        crate::Error::config_error(format!(
            "{section} API key not configured. Set [{section}] api_key in config.toml or export {env_var}"
        ))
    })
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_caption_prompt() -> String {
    "Describe this image in vivid detail as a prompt for generating a short cinematic video: \
     subjects, setting, lighting, mood and the natural motion that could follow."
        .to_string()
}

fn default_caption_temperature() -> f32 {
    0.1
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_refine_prompt() -> String {
    "You rewrite image descriptions into a single concise text-to-video prompt. \
     Keep the subjects and setting, add camera movement and motion, and reply with the prompt only."
        .to_string()
}

fn default_kie_base_url() -> String {
    "https://api.kie.ai".to_string()
}

fn default_image_to_video_model() -> String {
    "kling/v2-5-turbo-image-to-video-pro".to_string()
}

fn default_text_to_video_model() -> String {
    "kling/v2-5-turbo-text-to-video-pro".to_string()
}

fn default_fallback_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_negative_prompt() -> String {
    "blur, distort, and low quality".to_string()
}

fn default_cfg_scale() -> f64 {
    0.3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}
