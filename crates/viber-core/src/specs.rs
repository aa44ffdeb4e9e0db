use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// How the user supplied their project description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Interactive,
    Freetext,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Interactive => "interactive",
            InputMode::Freetext => "freetext",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "interactive" => Some(InputMode::Interactive),
            "freetext" => Some(InputMode::Freetext),
            _ => None,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of documentation package to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Context document plus one prompt file per build phase.
    ClaudeMd,
    /// The full five-file scaffold package.
    FullScaffold,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::ClaudeMd => "claude-md",
            OutputMode::FullScaffold => "full-scaffold",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "claude-md" => Some(OutputMode::ClaudeMd),
            "full-scaffold" => Some(OutputMode::FullScaffold),
            _ => None,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of the project to document.
///
/// Collected either through the guided Q&A steps or extracted from a
/// free-text description by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpecs {
    pub project_name: String,
    pub description: String,
    pub framework: String,
    pub language: String,
    pub styling: String,
    pub database: String,
    pub orm: String,
    pub auth: String,
    pub hosting: String,
    /// Accepts either a JSON array or a comma-separated string on input;
    /// extraction responses use both shapes.
    #[serde(deserialize_with = "features_from_string_or_seq")]
    pub features: Vec<String>,
    pub architecture: String,
    pub constraints: String,
    pub ai_usage: String,
    pub goals: String,
}

impl Default for ProjectSpecs {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            description: String::new(),
            framework: String::new(),
            language: "TypeScript".into(),
            styling: String::new(),
            database: String::new(),
            orm: String::new(),
            auth: String::new(),
            hosting: String::new(),
            features: Vec::new(),
            architecture: String::new(),
            constraints: String::new(),
            ai_usage: String::new(),
            goals: String::new(),
        }
    }
}

fn features_from_string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Features {
        Many(Vec<String>),
        One(String),
    }

    match Features::deserialize(deserializer)? {
        Features::Many(v) => Ok(v),
        Features::One(s) => Ok(s
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mode_roundtrip() {
        for m in [InputMode::Interactive, InputMode::Freetext] {
            assert_eq!(InputMode::parse_str(m.as_str()), Some(m));
            assert_eq!(format!("{m}"), m.as_str());
        }
        assert_eq!(InputMode::parse_str("guided"), None);
        assert_eq!(InputMode::parse_str(""), None);
    }

    #[test]
    fn output_mode_roundtrip() {
        for m in [OutputMode::ClaudeMd, OutputMode::FullScaffold] {
            assert_eq!(OutputMode::parse_str(m.as_str()), Some(m));
            assert_eq!(format!("{m}"), m.as_str());
        }
        assert_eq!(OutputMode::parse_str("scaffold"), None);
    }

    #[test]
    fn output_mode_serde_kebab() {
        let json = serde_json::to_string(&OutputMode::FullScaffold).unwrap();
        assert_eq!(json, "\"full-scaffold\"");
        let back: OutputMode = serde_json::from_str("\"claude-md\"").unwrap();
        assert_eq!(back, OutputMode::ClaudeMd);
    }

    #[test]
    fn default_specs_language() {
        let specs = ProjectSpecs::default();
        assert_eq!(specs.language, "TypeScript");
        assert!(specs.project_name.is_empty());
        assert!(specs.features.is_empty());
    }

    #[test]
    fn specs_camel_case_wire_format() {
        let specs = ProjectSpecs {
            project_name: "demo".into(),
            ai_usage: "Claude Code".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&specs).unwrap();
        assert_eq!(json["projectName"], "demo");
        assert_eq!(json["aiUsage"], "Claude Code");
        assert!(json.get("project_name").is_none());
    }

    #[test]
    fn features_deserialize_from_array() {
        let json = r#"{"projectName":"x","description":"","framework":"","language":"","styling":"","database":"","orm":"","auth":"","hosting":"","features":["Login","Dashboard"],"architecture":"","constraints":"","aiUsage":"","goals":""}"#;
        let specs: ProjectSpecs = serde_json::from_str(json).unwrap();
        assert_eq!(specs.features, vec!["Login", "Dashboard"]);
    }

    #[test]
    fn features_deserialize_from_comma_string() {
        let json = r#"{"projectName":"x","description":"","framework":"","language":"","styling":"","database":"","orm":"","auth":"","hosting":"","features":"Login, Dashboard, ,API","architecture":"","constraints":"","aiUsage":"","goals":""}"#;
        let specs: ProjectSpecs = serde_json::from_str(json).unwrap();
        assert_eq!(specs.features, vec!["Login", "Dashboard", "API"]);
    }
}
