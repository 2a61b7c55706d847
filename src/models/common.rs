use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the user asked the studio to do with the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    Generate,
    ChangeCloth,
    ChangeBackground,
}

impl EditMode {
    pub const ALL: [EditMode; 3] = [
        EditMode::Generate,
        EditMode::ChangeCloth,
        EditMode::ChangeBackground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Generate => "generate",
            EditMode::ChangeCloth => "changeCloth",
            EditMode::ChangeBackground => "changeBackground",
        }
    }

    /// Edit modes need an uploaded image; `Generate` does not.
    pub fn requires_image(&self) -> bool {
        !matches!(self, EditMode::Generate)
    }

    /// Builds the instruction sent to the edit model, or `None` for `Generate`.
    pub fn instruction(&self, prompt: &str) -> Option<String> {
        match self {
            EditMode::ChangeCloth => Some(format!(
                "Based on the user's prompt \"{}\", change only the clothing of the person in the image. Maintain the original person, pose, and background.",
                prompt
            )),
            EditMode::ChangeBackground => Some(format!(
                "Based on the user's prompt \"{}\", change only the background of the image. Keep the foreground subjects (people, objects) exactly as they are.",
                prompt
            )),
            EditMode::Generate => None,
        }
    }

    pub fn loading_message(&self) -> &'static str {
        match self {
            EditMode::Generate => "Generating your masterpiece...",
            EditMode::ChangeCloth => "Tailoring new clothes for your image...",
            EditMode::ChangeBackground => "Scouting for a new background...",
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(EditMode::Generate),
            "changeCloth" | "change-cloth" => Ok(EditMode::ChangeCloth),
            "changeBackground" | "change-background" => Ok(EditMode::ChangeBackground),
            other => Err(format!("unknown edit mode: {}", other)),
        }
    }
}
