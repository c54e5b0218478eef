//! Multipart bodies for the file-bearing endpoints.

use reqwest::multipart::{Form, Part};

use crate::errors::Result;
use crate::types::{Blob, NamedFile};

/// File name given to raw audio in the combined consultation upload.
pub const RECORDING_FILE_NAME: &str = "recording.wav";
/// MIME type given to raw audio in the combined consultation upload.
pub const RECORDING_CONTENT_TYPE: &str = "audio/wav";

fn file_part(file: NamedFile) -> Result<Part> {
    let part = Part::bytes(file.blob.data.to_vec()).file_name(file.file_name);
    match file.blob.content_type {
        Some(content_type) => Ok(part.mime_str(&content_type)?),
        None => Ok(part),
    }
}

/// Form for `/medical-consultation`. Absent inputs are left out; both absent gives an empty form.
pub(crate) fn consultation_form(image: Option<NamedFile>, audio: Option<Blob>) -> Result<Form> {
    let mut form = Form::new();

    if let Some(image) = image {
        form = form.part("image", file_part(image)?);
    }

    if let Some(audio) = audio {
        let recording = audio.into_file(RECORDING_FILE_NAME, RECORDING_CONTENT_TYPE);
        form = form.part("audio", file_part(recording)?);
    }

    Ok(form)
}

/// Form for `/transcribe-audio`. The file goes out under its own name and type.
pub(crate) fn transcription_form(audio: NamedFile) -> Result<Form> {
    Ok(Form::new().part("audio", file_part(audio)?))
}

/// Form for `/analyze-image`. An empty transcription is treated as absent.
pub(crate) fn analysis_form(image: NamedFile, transcription: Option<&str>) -> Result<Form> {
    let mut form = Form::new().part("image", file_part(image)?);

    if let Some(text) = transcription.filter(|text| !text.is_empty()) {
        form = form.text("transcription", text.to_string());
    }

    Ok(form)
}
