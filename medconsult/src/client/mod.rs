//! HTTP client for the consultation backend.
//!
//! [`ConsultationApi`] is the seam callers program against; [`ConsultationClient`] is the
//! `reqwest`-backed implementation. Each operation issues exactly one request to
//! `{api_base_url}{path}` and hands back the decoded body. Nothing is retried: transport errors,
//! non-2xx statuses and undecodable bodies are returned to the caller as [`Error`].
//!
//! # Example
//! ```no_run
//! use medconsult::{Blob, ConsultationApi, ConsultationClient, NamedFile};
//!
//! # async fn run() -> medconsult::errors::Result<()> {
//! let client = ConsultationClient::new("http://localhost:8000".parse()?)?;
//!
//! let image = NamedFile::new("rash.jpg", Blob::new(std::fs::read("rash.jpg").unwrap()).with_content_type("image/jpeg"));
//! let result = client.medical_consultation(Some(image), None).await?;
//! println!("{}", result.analysis);
//! # Ok(())
//! # }
//! ```

mod form;

pub use form::{RECORDING_CONTENT_TYPE, RECORDING_FILE_NAME};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::types::{AnalysisResponse, Blob, ConsultationResult, HealthResponse, NamedFile, TextToSpeechRequest, TranscriptionResponse};

pub const MEDICAL_CONSULTATION_PATH: &str = "/medical-consultation";
pub const TRANSCRIBE_AUDIO_PATH: &str = "/transcribe-audio";
pub const ANALYZE_IMAGE_PATH: &str = "/analyze-image";
pub const TEXT_TO_SPEECH_PATH: &str = "/text-to-speech";
pub const HEALTH_CHECK_PATH: &str = "/";

/// Operations offered by the consultation backend.
#[async_trait]
pub trait ConsultationApi: Send + Sync {
    /// Combined consultation. Either input may be absent; raw audio is sent as `recording.wav`.
    async fn medical_consultation(&self, image: Option<NamedFile>, audio: Option<Blob>) -> Result<ConsultationResult>;

    /// Transcribe an audio file, sent under its own name and type.
    async fn transcribe_audio(&self, audio: NamedFile) -> Result<TranscriptionResponse>;

    /// Analyze an image, optionally with the transcription of what the patient said.
    async fn analyze_image(&self, image: NamedFile, transcription: Option<String>) -> Result<AnalysisResponse>;

    /// Synthesize speech. The response body is returned as raw bytes.
    async fn text_to_speech(&self, text: &str) -> Result<Blob>;

    async fn health_check(&self) -> Result<HealthResponse>;
}

/// `reqwest`-backed client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ConsultationClient {
    client: Client,
    base_url: Url,
}

impl ConsultationClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // Multipart and JSON bodies set their own Content-Type, which takes precedence
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an endpoint path, keeping any path prefix on the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(ensure_slash(&self.base_url).join(path.trim_start_matches('/'))?)
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "Sending multipart request");

        let response = self.client.post(url.clone()).multipart(form).send().await.map_err(|e| {
            error!(url = %url, error = %e, "HTTP request failed");
            e
        })?;

        decode_json(&url, response).await
    }
}

/// Makes sure a url has a trailing slash, so that `join` appends rather than replaces the last
/// path segment ('/api' + 'x' is '/x', but '/api/' + 'x' is '/api/x').
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

async fn check_status(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(url = %url, status = status.as_u16(), "Backend returned error status");
    Err(Error::Status { status, body })
}

async fn decode_json<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
    let response = check_status(url, response).await?;
    let status = response.status();
    let body = response.text().await?;

    info!(status = status.as_u16(), response_len = body.len(), "HTTP request completed");

    serde_json::from_str(&body).map_err(|e| {
        error!(url = %url, error = %e, "Failed to parse response body as JSON");
        debug!("Response body was: {}", body);
        Error::from(e)
    })
}

#[async_trait]
impl ConsultationApi for ConsultationClient {
    #[instrument(skip_all, fields(path = MEDICAL_CONSULTATION_PATH, has_image = image.is_some(), has_audio = audio.is_some()))]
    async fn medical_consultation(&self, image: Option<NamedFile>, audio: Option<Blob>) -> Result<ConsultationResult> {
        if image.is_none() && audio.is_none() {
            // The backend decides whether an empty consultation is acceptable
            warn!("Neither image nor audio provided, sending empty form");
        }

        let form = form::consultation_form(image, audio)?;
        self.post_form(MEDICAL_CONSULTATION_PATH, form).await
    }

    #[instrument(skip_all, fields(path = TRANSCRIBE_AUDIO_PATH, file_name = %audio.file_name, size = audio.blob.len()))]
    async fn transcribe_audio(&self, audio: NamedFile) -> Result<TranscriptionResponse> {
        let form = form::transcription_form(audio)?;
        self.post_form(TRANSCRIBE_AUDIO_PATH, form).await
    }

    #[instrument(skip_all, fields(path = ANALYZE_IMAGE_PATH, file_name = %image.file_name, has_transcription = transcription.is_some()))]
    async fn analyze_image(&self, image: NamedFile, transcription: Option<String>) -> Result<AnalysisResponse> {
        let form = form::analysis_form(image, transcription.as_deref())?;
        self.post_form(ANALYZE_IMAGE_PATH, form).await
    }

    #[instrument(skip_all, fields(path = TEXT_TO_SPEECH_PATH, text_len = text.len()))]
    async fn text_to_speech(&self, text: &str) -> Result<Blob> {
        let url = self.endpoint(TEXT_TO_SPEECH_PATH)?;
        debug!(url = %url, "Sending text-to-speech request");

        let response = self
            .client
            .post(url.clone())
            .json(&TextToSpeechRequest { text })
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "HTTP request failed");
                e
            })?;
        let response = check_status(&url, response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let data = response.bytes().await?;

        info!(response_len = data.len(), content_type = ?content_type, "HTTP request completed");
        Ok(Blob { data, content_type })
    }

    #[instrument(skip_all, fields(path = HEALTH_CHECK_PATH))]
    async fn health_check(&self) -> Result<HealthResponse> {
        let url = self.endpoint(HEALTH_CHECK_PATH)?;
        debug!(url = %url, "Sending health check");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "HTTP request failed");
            e
        })?;

        decode_json(&url, response).await
    }
}
