//! # medconsult: client for the medical consultation backend
//!
//! `medconsult` wraps the consultation backend's HTTP API. It packages images and audio
//! recordings into multipart uploads, forwards them to the backend and hands back the decoded
//! responses: transcriptions, image analyses, combined consultation results and synthesized
//! speech.
//!
//! ## Overview
//!
//! The crate is deliberately thin. Every operation is one request to `{api_base_url}{path}` and
//! one decoded response; there are no retries, no caching and no local validation beyond decoding
//! the body. The only local transformation is in the combined consultation, where a raw audio
//! [`Blob`] is uploaded as `recording.wav` with type `audio/wav`.
//!
//! | Operation | Request | Response |
//! |---|---|---|
//! | [`ConsultationApi::medical_consultation`] | `POST /medical-consultation` (multipart `image?`, `audio?`) | [`ConsultationResult`] |
//! | [`ConsultationApi::transcribe_audio`] | `POST /transcribe-audio` (multipart `audio`) | [`TranscriptionResponse`] |
//! | [`ConsultationApi::analyze_image`] | `POST /analyze-image` (multipart `image`, `transcription?`) | [`AnalysisResponse`] |
//! | [`ConsultationApi::text_to_speech`] | `POST /text-to-speech` (JSON `{"text": ...}`) | raw audio [`Blob`] |
//! | [`ConsultationApi::health_check`] | `GET /` | [`HealthResponse`] |
//!
//! ## Configuration
//!
//! The backend address is resolved once at startup by [`Config::load`]: YAML file, then the
//! `API_BASE_URL` environment variable, then `MEDCONSULT_*` variables, then `--api-base-url`.
//! It defaults to `http://localhost:8000`. See [`config`] for details.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use medconsult::{Config, ConsultationApi, ConsultationClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = medconsult::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     medconsult::telemetry::init_telemetry(config.log_format)?;
//!
//!     let client = ConsultationClient::from_config(&config)?;
//!     let health = client.health_check().await?;
//!     println!("{}", health.message);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use client::{ConsultationApi, ConsultationClient};
pub use config::Config;
pub use errors::{Error, Result};
pub use types::{AnalysisResponse, Blob, ConsultationResult, HealthResponse, NamedFile, TranscriptionResponse};
