//! Subcommands of the `medconsult` binary.
//!
//! Each command maps onto one [`ConsultationApi`] operation. Results are rendered as pretty JSON
//! for stdout; synthesized speech is written to the requested file instead.

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::client::ConsultationApi;
use crate::types::{Blob, NamedFile};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full consultation from an image and/or an audio recording
    Consult {
        /// Image of the affected area
        #[arg(long)]
        image: Option<PathBuf>,
        /// Audio recording; uploaded as recording.wav whatever its format
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    /// Transcribe an audio file
    Transcribe {
        /// Audio file to upload
        audio: PathBuf,
    },
    /// Analyze an image
    Analyze {
        /// Image file to upload
        image: PathBuf,
        /// What the patient said, to give the analysis context
        #[arg(long)]
        transcription: Option<String>,
    },
    /// Synthesize speech and save it to a file
    Speak {
        /// Text to read out
        text: String,
        /// Where to write the audio
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check that the backend is up
    Health,
}

/// Run a command against the backend and return what should be printed.
pub async fn run<A: ConsultationApi + ?Sized>(api: &A, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Consult { image, audio } => {
            let image = match image {
                Some(path) => Some(
                    NamedFile::from_path(&path)
                        .await
                        .with_context(|| format!("Failed to read image {}", path.display()))?,
                ),
                None => None,
            };
            let audio = match audio {
                Some(path) => Some(
                    Blob::from_path(&path)
                        .await
                        .with_context(|| format!("Failed to read audio {}", path.display()))?,
                ),
                None => None,
            };

            let result = api.medical_consultation(image, audio).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Transcribe { audio } => {
            let audio = NamedFile::from_path(&audio)
                .await
                .with_context(|| format!("Failed to read audio {}", audio.display()))?;

            let result = api.transcribe_audio(audio).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Analyze { image, transcription } => {
            let image = NamedFile::from_path(&image)
                .await
                .with_context(|| format!("Failed to read image {}", image.display()))?;

            let result = api.analyze_image(image, transcription).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Speak { text, output } => {
            let audio = api.text_to_speech(&text).await?;
            tokio::fs::write(&output, &audio.data)
                .await
                .with_context(|| format!("Failed to write audio to {}", output.display()))?;

            tracing::info!(output = %output.display(), bytes = audio.len(), "Saved synthesized speech");
            Ok(serde_json::to_string_pretty(&json!({
                "output": output.display().to_string(),
                "bytes": audio.len(),
                "content_type": audio.content_type,
            }))?)
        }
        Command::Health => {
            let result = api.health_check().await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use crate::errors::Error;
    use crate::test_utils::{MockCall, MockConsultationApi};
    use clap::Parser;
    use reqwest::StatusCode;

    #[test]
    fn test_parse_consult_command() {
        let args = Args::try_parse_from(["medconsult", "consult", "--image", "rash.jpg", "--audio", "note.webm"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Consult {
                image: Some(PathBuf::from("rash.jpg")),
                audio: Some(PathBuf::from("note.webm")),
            })
        );
    }

    #[test]
    fn test_parse_global_base_url_after_subcommand() {
        let args = Args::try_parse_from(["medconsult", "health", "--api-base-url", "http://backend:9000"]).unwrap();
        assert_eq!(args.command, Some(Command::Health));
        assert_eq!(args.api_base_url.unwrap().as_str(), "http://backend:9000/");
    }

    #[test]
    fn test_speak_requires_output() {
        assert!(Args::try_parse_from(["medconsult", "speak", "hello"]).is_err());
    }

    #[tokio::test]
    async fn test_consult_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("rash.jpg");
        let audio = dir.path().join("note.webm");
        tokio::fs::write(&image, b"jpeg bytes").await.unwrap();
        tokio::fs::write(&audio, b"webm bytes").await.unwrap();

        let api = MockConsultationApi::new();
        let output = run(
            &api,
            Command::Consult {
                image: Some(image),
                audio: Some(audio),
            },
        )
        .await
        .unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(printed["analysis"], MockConsultationApi::ANALYSIS);

        let calls = api.get_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            MockCall::MedicalConsultation {
                image: Some(image),
                audio: Some(audio),
            } => {
                assert_eq!(image.file_name, "rash.jpg");
                assert_eq!(image.content_type(), Some("image/jpeg"));
                assert_eq!(&audio.data[..], &b"webm bytes"[..]);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_consult_without_inputs_still_calls_backend() {
        let api = MockConsultationApi::new();
        run(&api, Command::Consult { image: None, audio: None }).await.unwrap();

        assert_eq!(api.get_calls(), vec![MockCall::MedicalConsultation { image: None, audio: None }]);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported_before_any_request() {
        let api = MockConsultationApi::new();
        let err = run(
            &api,
            Command::Transcribe {
                audio: PathBuf::from("/definitely/not/here.wav"),
            },
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to read audio"));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_passes_transcription() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("eye.png");
        tokio::fs::write(&image, b"png").await.unwrap();

        let api = MockConsultationApi::new();
        run(
            &api,
            Command::Analyze {
                image,
                transcription: Some("red and itchy".to_string()),
            },
        )
        .await
        .unwrap();

        match &api.get_calls()[0] {
            MockCall::AnalyzeImage { image, transcription } => {
                assert_eq!(image.file_name, "eye.png");
                assert_eq!(transcription.as_deref(), Some("red and itchy"));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_speak_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("reply.mp3");

        let api = MockConsultationApi::new();
        let printed = run(
            &api,
            Command::Speak {
                text: "take two a day".to_string(),
                output: output.clone(),
            },
        )
        .await
        .unwrap();

        let written = tokio::fs::read(&output).await.unwrap();
        assert_eq!(written, MockConsultationApi::SPEECH);

        let printed: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(printed["bytes"], MockConsultationApi::SPEECH.len());
        assert_eq!(
            api.get_calls(),
            vec![MockCall::TextToSpeech {
                text: "take two a day".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let api = MockConsultationApi::failing(StatusCode::SERVICE_UNAVAILABLE);
        let err = run(&api, Command::Health).await.unwrap_err();

        let err = err.downcast_ref::<Error>().expect("client error is preserved");
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(api.call_count(), 1);
    }
}
