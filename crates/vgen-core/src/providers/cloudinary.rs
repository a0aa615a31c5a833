//! Cloudinary image hosting
//!
//! Inline images are uploaded unsigned with a preset; the returned `secure_url` is the
//! public HTTPS address handed to the other providers.

use crate::config::CloudinarySettings;
use crate::{Error, Result, providers::ImageHost};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use serde::Deserialize;

const PROVIDER: &str = "cloudinary";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: String,
}

pub struct CloudinaryHost {
    client: Client,
    upload_url: String,
    upload_preset: String,
    folder: Option<String>,
}

impl CloudinaryHost {
    pub fn new(cloud_name: &str, upload_preset: impl Into<String>) -> Self {
        Self::with_upload_url(
            format!("https://api.cloudinary.com/v1_1/{}/image/upload", cloud_name),
            upload_preset,
        )
    }

    /// Point at a non-default upload endpoint
    pub fn with_upload_url(upload_url: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            upload_url: upload_url.into(),
            upload_preset: upload_preset.into(),
            folder: None,
        }
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Returns `None` unless both cloud name and preset are configured
    pub fn from_settings(settings: &CloudinarySettings) -> Option<Self> {
        let cloud_name = settings.cloud_name.as_deref()?;
        let preset = settings.upload_preset.clone()?;
        let host = Self::new(cloud_name, preset);
        Some(match &settings.folder {
            Some(folder) => host.folder(folder.clone()),
            None => host,
        })
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, data_url: &str) -> Result<String> {
        let mut form = Form::new()
            .text("file", data_url.to_string())
            .text("upload_preset", self.upload_preset.clone());
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Upload request failed: {}", e)))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse upload response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(Error::provider(
                PROVIDER,
                format!("Upload failed {}: {}", status, error.message),
            ));
        }

        match body.secure_url {
            Some(url) if status.is_success() => Ok(url),
            _ => Err(Error::provider(
                PROVIDER,
                format!("Upload returned {} without a secure_url", status),
            )),
        }
    }
}
