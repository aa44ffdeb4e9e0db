use std::fmt;

use serde::{Deserialize, Serialize};

/// One logical output document produced by a generation.
///
/// Filenames are unique per session in insertion order; the first file is the
/// default displayed one. The list is rebuilt wholesale on every re-parse of
/// the accumulated stream, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Lifecycle of one generation session.
///
/// `idle → generating → {complete | error}`; `generating → idle` on
/// cancellation. Terminal states restart at `generating` on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Idle,
    Generating,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Generating => "generating",
            GenerationStatus::Complete => "complete",
            GenerationStatus::Error => "error",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(GenerationStatus::Idle),
            "generating" => Some(GenerationStatus::Generating),
            "complete" => Some(GenerationStatus::Complete),
            "error" => Some(GenerationStatus::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Complete | GenerationStatus::Error)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a generation session, as read by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationState {
    pub status: GenerationStatus,
    pub files: Vec<GeneratedFile>,
    /// Index of the file currently receiving bytes; `None` before any file
    /// exists. Rewound to the first file when the session completes.
    pub current_file_index: Option<usize>,
    /// Live content of whichever file is still growing, for display before
    /// its boundary is known to be final.
    pub streaming_content: String,
    pub error: Option<String>,
}

impl GenerationState {
    pub fn initial() -> Self {
        Self {
            status: GenerationStatus::Idle,
            files: Vec::new(),
            current_file_index: None,
            streaming_content: String::new(),
            error: None,
        }
    }
}

impl Default for GenerationState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_str_all() {
        assert_eq!(GenerationStatus::parse_str("idle"), Some(GenerationStatus::Idle));
        assert_eq!(
            GenerationStatus::parse_str("generating"),
            Some(GenerationStatus::Generating)
        );
        assert_eq!(
            GenerationStatus::parse_str("complete"),
            Some(GenerationStatus::Complete)
        );
        assert_eq!(GenerationStatus::parse_str("error"), Some(GenerationStatus::Error));
        assert_eq!(GenerationStatus::parse_str("running"), None);
        assert_eq!(GenerationStatus::parse_str(""), None);
    }

    #[test]
    fn status_as_str_roundtrip() {
        let all = [
            GenerationStatus::Idle,
            GenerationStatus::Generating,
            GenerationStatus::Complete,
            GenerationStatus::Error,
        ];
        for s in &all {
            assert_eq!(GenerationStatus::parse_str(s.as_str()), Some(*s));
            assert_eq!(format!("{s}"), s.as_str());
        }
    }

    #[test]
    fn terminal_states() {
        assert!(!GenerationStatus::Idle.is_terminal());
        assert!(!GenerationStatus::Generating.is_terminal());
        assert!(GenerationStatus::Complete.is_terminal());
        assert!(GenerationStatus::Error.is_terminal());
    }

    #[test]
    fn initial_state_is_empty() {
        let state = GenerationState::initial();
        assert_eq!(state.status, GenerationStatus::Idle);
        assert!(state.files.is_empty());
        assert_eq!(state.current_file_index, None);
        assert!(state.streaming_content.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn state_camel_case_wire_format() {
        let state = GenerationState::initial();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "idle");
        assert!(json["currentFileIndex"].is_null());
        assert_eq!(json["streamingContent"], "");
    }
}
