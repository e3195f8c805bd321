//! Opaque generation parameters.
//!
//! The job manager never inspects these. Field names below are the ones the
//! generation surfaces agree on, and [`JobParams::validate_for`] is the
//! minimal-required-fields check a caller runs before submitting.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult};
use crate::job::JobKind;

pub const TEXT: &str = "text";
pub const VOICE: &str = "voice";
pub const LANGUAGE: &str = "language";
pub const GENRE: &str = "genre";
pub const MOOD: &str = "mood";
pub const DURATION_MIN: &str = "duration_min";
pub const PITCH: &str = "pitch";
pub const SOURCE_NAME: &str = "source_name";
pub const YOUTUBE_URL: &str = "youtube_url";
pub const VOICE_NAME: &str = "voice_name";
pub const SCRIPT: &str = "script";

/// Generation parameters as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobParams(pub Map<String, Value>);

impl JobParams {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a field, if present and a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric value of a field, accepting numbers and numeric strings.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the minimal required fields for `kind`.
    pub fn validate_for(&self, kind: JobKind) -> ValidationResult<()> {
        match kind {
            JobKind::Tts => {
                self.require_text(kind, TEXT)?;
                self.require_text(kind, VOICE)?;
            }
            JobKind::Music => {
                if let Some(duration) = self.get(DURATION_MIN) {
                    let minutes = self.number(DURATION_MIN).ok_or_else(|| {
                        ValidationError::invalid_field(kind, DURATION_MIN, format!("not a number: {}", duration))
                    })?;
                    if minutes <= 0.0 || !minutes.is_finite() {
                        return Err(ValidationError::invalid_field(kind, DURATION_MIN, "must be positive"));
                    }
                }
            }
            JobKind::VoiceCover => {
                if self.non_blank(SOURCE_NAME).is_none() && self.non_blank(YOUTUBE_URL).is_none() {
                    return Err(ValidationError::missing_field(kind, SOURCE_NAME));
                }
                self.require_text(kind, VOICE)?;
            }
            JobKind::SpeechToSpeech => {
                self.require_text(kind, SOURCE_NAME)?;
            }
            JobKind::VoiceCloneTraining => {
                self.require_text(kind, VOICE_NAME)?;
            }
            JobKind::Voiceover => {
                self.require_text(kind, SCRIPT)?;
            }
        }
        Ok(())
    }

    fn non_blank(&self, key: &str) -> Option<&str> {
        self.str(key).filter(|s| !s.trim().is_empty())
    }

    fn require_text(&self, kind: JobKind, field: &'static str) -> ValidationResult<&str> {
        self.non_blank(field)
            .ok_or_else(|| ValidationError::missing_field(kind, field))
    }
}

impl From<Map<String, Value>> for JobParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_requires_text_and_voice() {
        let params = JobParams::new().with(TEXT, "   ").with(VOICE, "sarah");
        assert_eq!(
            params.validate_for(JobKind::Tts),
            Err(ValidationError::missing_field(JobKind::Tts, TEXT))
        );

        let params = JobParams::new().with(TEXT, "Hello there");
        assert_eq!(
            params.validate_for(JobKind::Tts),
            Err(ValidationError::missing_field(JobKind::Tts, VOICE))
        );

        let params = params.with(VOICE, "sarah");
        assert!(params.validate_for(JobKind::Tts).is_ok());
    }

    #[test]
    fn test_voice_cover_accepts_either_source() {
        let from_file = JobParams::new().with(SOURCE_NAME, "song.mp3").with(VOICE, "pop-diva");
        let from_url = JobParams::new()
            .with(YOUTUBE_URL, "https://youtube.com/watch?v=abc")
            .with(VOICE, "pop-diva");
        let neither = JobParams::new().with(VOICE, "pop-diva");

        assert!(from_file.validate_for(JobKind::VoiceCover).is_ok());
        assert!(from_url.validate_for(JobKind::VoiceCover).is_ok());
        assert!(neither.validate_for(JobKind::VoiceCover).is_err());
    }

    #[test]
    fn test_music_duration_must_be_positive() {
        assert!(JobParams::new().validate_for(JobKind::Music).is_ok());
        assert!(JobParams::new().with(DURATION_MIN, "2").validate_for(JobKind::Music).is_ok());
        assert!(JobParams::new().with(DURATION_MIN, 0).validate_for(JobKind::Music).is_err());
        assert!(JobParams::new().with(DURATION_MIN, "soon").validate_for(JobKind::Music).is_err());
    }

    #[test]
    fn test_voiceover_requires_script() {
        assert!(JobParams::new().validate_for(JobKind::Voiceover).is_err());
        assert!(JobParams::new()
            .with(SCRIPT, "Welcome to the studio.")
            .validate_for(JobKind::Voiceover)
            .is_ok());
    }

    #[test]
    fn test_number_accepts_strings() {
        let params = JobParams::new().with(PITCH, "-3").with(DURATION_MIN, 2.5);
        assert_eq!(params.number(PITCH), Some(-3.0));
        assert_eq!(params.number(DURATION_MIN), Some(2.5));
        assert_eq!(params.number(GENRE), None);
    }

    #[test]
    fn test_params_serialize_as_plain_object() {
        let params = JobParams::new().with(GENRE, "jazz");
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"genre":"jazz"}"#);
    }
}
