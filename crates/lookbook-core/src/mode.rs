//! Workspace modes (the studio's tabs)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LookbookError;

/// One of the three shooting modes. The mode decides which uploads are
/// required and which prompt templates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Product-only hero shots
    #[default]
    Spotlight,
    /// Product worn or used by a model in urban scenes
    Lifestyle,
    /// Re-shoot of a reference image from new angles and poses
    ShotLab,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Spotlight, Mode::Lifestyle, Mode::ShotLab];

    /// Stable key used in config files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Spotlight => "spotlight",
            Mode::Lifestyle => "lifestyle",
            Mode::ShotLab => "shot-lab",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Spotlight => write!(f, "Spotlight"),
            Mode::Lifestyle => write!(f, "Lifestyle"),
            Mode::ShotLab => write!(f, "Shot Lab"),
        }
    }
}

impl FromStr for Mode {
    type Err = LookbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "spotlight" => Ok(Mode::Spotlight),
            "lifestyle" => Ok(Mode::Lifestyle),
            "shot-lab" | "shotlab" => Ok(Mode::ShotLab),
            other => Err(LookbookError::ParseError(format!(
                "Unknown mode '{}'. Use: spotlight, lifestyle, shot-lab",
                other
            ))),
        }
    }
}
