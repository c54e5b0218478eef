//! Test doubles for code written against [`ConsultationApi`].

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::client::ConsultationApi;
use crate::errors::{Error, Result};
use crate::types::{AnalysisResponse, Blob, ConsultationResult, HealthResponse, NamedFile, TranscriptionResponse};

/// Record of a call made to the mock API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    MedicalConsultation { image: Option<NamedFile>, audio: Option<Blob> },
    TranscribeAudio { audio: NamedFile },
    AnalyzeImage { image: NamedFile, transcription: Option<String> },
    TextToSpeech { text: String },
    HealthCheck,
}

/// Mock API that records every call and answers with canned bodies, or with a fixed error status.
#[derive(Default)]
pub struct MockConsultationApi {
    calls: Mutex<Vec<MockCall>>,
    fail_with: Option<StatusCode>,
}

impl MockConsultationApi {
    pub const TRANSCRIPTION: &'static str = "mock transcription";
    pub const ANALYSIS: &'static str = "mock analysis";
    pub const SPEECH: &'static [u8] = b"ID3 mock speech";

    pub fn new() -> Self {
        Self::default()
    }

    /// Every call is recorded, then fails as if the backend answered with `status`.
    pub fn failing(status: StatusCode) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(status),
        }
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        self.calls.lock().push(call);
        match self.fail_with {
            Some(status) => Err(Error::Status {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConsultationApi for MockConsultationApi {
    async fn medical_consultation(&self, image: Option<NamedFile>, audio: Option<Blob>) -> Result<ConsultationResult> {
        self.record(MockCall::MedicalConsultation { image, audio })?;
        Ok(ConsultationResult {
            transcription: Self::TRANSCRIPTION.to_string(),
            analysis: Self::ANALYSIS.to_string(),
            audio_url: None,
        })
    }

    async fn transcribe_audio(&self, audio: NamedFile) -> Result<TranscriptionResponse> {
        self.record(MockCall::TranscribeAudio { audio })?;
        Ok(TranscriptionResponse {
            transcription: Self::TRANSCRIPTION.to_string(),
        })
    }

    async fn analyze_image(&self, image: NamedFile, transcription: Option<String>) -> Result<AnalysisResponse> {
        self.record(MockCall::AnalyzeImage { image, transcription })?;
        Ok(AnalysisResponse {
            analysis: Self::ANALYSIS.to_string(),
        })
    }

    async fn text_to_speech(&self, text: &str) -> Result<Blob> {
        self.record(MockCall::TextToSpeech { text: text.to_string() })?;
        Ok(Blob::new(Self::SPEECH).with_content_type("audio/mpeg"))
    }

    async fn health_check(&self) -> Result<HealthResponse> {
        self.record(MockCall::HealthCheck)?;
        Ok(HealthResponse {
            message: "mock backend is running".to_string(),
            extra: Default::default(),
        })
    }
}
