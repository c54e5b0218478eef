//! Request payloads and response bodies exchanged with the consultation backend.
//!
//! Uploads come in two shapes:
//!
//! - [`Blob`]: raw bytes with an optional MIME type and no name (e.g. audio captured in memory)
//! - [`NamedFile`]: a blob with a file name, sent as-is in a multipart part
//!
//! Responses are plain serde structs. Required fields are enforced at decode time, so a
//! `ConsultationResult` without `analysis` fails with [`crate::errors::Error::Json`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// In-memory binary payload without an inherent file name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a blob from disk, guessing the MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        Ok(Self {
            data: Bytes::from(data),
            content_type: guess_content_type(path),
        })
    }

    /// Wrap this blob into a named file, replacing whatever type it carried.
    pub fn into_file(self, file_name: impl Into<String>, content_type: impl Into<String>) -> NamedFile {
        NamedFile {
            file_name: file_name.into(),
            blob: Blob {
                data: self.data,
                content_type: Some(content_type.into()),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A blob with a file name, the unit of a multipart file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    pub file_name: String,
    pub blob: Blob,
}

impl NamedFile {
    pub fn new(file_name: impl Into<String>, blob: Blob) -> Self {
        Self {
            file_name: file_name.into(),
            blob,
        }
    }

    /// Read a file from disk, keeping its base name and guessing its MIME type.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let blob = Blob::from_path(path).await?;
        Ok(Self { file_name, blob })
    }

    pub fn content_type(&self) -> Option<&str> {
        self.blob.content_type.as_deref()
    }
}

fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

/// Result of the combined image + audio consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationResult {
    pub transcription: String,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Body of `GET /`. Fields beyond `message` are kept as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// JSON body of `POST /text-to-speech`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TextToSpeechRequest<'a> {
    pub text: &'a str,
}
