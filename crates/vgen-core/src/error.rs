use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Request could not be turned into a usable prompt/image pair
    #[error("{0}")]
    Validation(String),

    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("No taskId returned from createTask; response: {raw}")]
    MalformedProviderResponse { raw: String },

    /// Both the primary and the fallback generation model failed
    #[error("Generation unavailable (fallback model {model}): {source}")]
    GenerationUnavailable {
        model: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Helper for creating validation errors
    ///
    /// # Example
    /// ```
    /// use vgen_core::Error;
    /// let err = Error::validation("A prompt is required to generate media");
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Helper for creating configuration errors
    pub fn config_error(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Helper for creating provider errors
    ///
    /// # Example
    /// ```
    /// use vgen_core::Error;
    /// let err = Error::provider("kie", "createTask returned 500");
    /// assert_eq!(err.to_string(), "kie error: createTask returned 500");
    /// ```
    pub fn provider(provider: &'static str, msg: impl Into<String>) -> Self {
        Error::Provider {
            provider,
            message: msg.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Transient overload signature used by the captioning retry loop.
    ///
    /// Matches `503`, `unavailable` or `overloaded` anywhere in the rendered error.
    pub fn is_overloaded(&self) -> bool {
        let rendered = self.to_string();
        let lower = rendered.to_lowercase();
        rendered.contains("503") || lower.contains("unavailable") || lower.contains("overloaded")
    }

    /// Service-unavailable signature used to trigger the generation fallback model.
    pub fn is_unavailable(&self) -> bool {
        let rendered = self.to_string();
        rendered.contains("503") || rendered.to_lowercase().contains("unavailab")
    }
}
