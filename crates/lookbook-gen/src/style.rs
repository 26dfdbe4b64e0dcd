//! Style selections and the prompt modifier chain
//!
//! A base template is finalized by running it through a fixed chain of
//! modifiers: theme, lighting, camera lens, free-text concept, and the
//! technical suffix. Each step is a pure function so it can be checked on
//! its own.

use lookbook_core::{LookbookError, Result};
use std::fmt;
use std::str::FromStr;

use crate::prompt;

/// Trailing directive appended to every finalized prompt
pub const TECHNICAL_SUFFIX: &str = " --ar 9:16 --q 2 --style raw";

/// Replacement prompt for the Aura theme
pub const AURA_TEMPLATE: &str = "Generate a high-quality, ultra-HD, sharp product photo in 9:16 vertical ratio, perfect portrait aspect. A dramatic, hyperrealistic product photo. The product appears to be levitating in the air, surrounded by frozen crumbs, splashes, or particles in motion. Use bold rim lighting and a macro focus. The background is vibrant to add energy and contrast. ";

/// Replacement prompt for the Dramatic & Dark theme
pub const DRAMATIC_DARK_TEMPLATE: &str = "A professional photograph of the exact uploaded product. The product must be the main subject and remain consistent. Arrange the plate with visually balanced fresh ingredients. Place a small glass bowl with sauce and a black fork/chopsticks. Surround the food with complementary elements. The overall aesthetic is minimalist, cinematic, and appetizing with soft, moody lighting. Use a dark, loose folded linen napkin underneath and around the plate to enhance texture and elegance. ";

pub const LIGHTING_OPTIONS: &[&str] = &[
    "Soft Natural Light",
    "Golden Hour",
    "Studio Softbox",
    "Dramatic Rim Light",
    "Moody Low Key",
    "Bright High Key",
];

pub const CAMERA_LENSES: &[&str] = &[
    "24mm wide-angle lens",
    "35mm lens",
    "50mm prime lens",
    "85mm portrait lens",
    "100mm macro lens",
];

pub const STUDIO_COLORS: &[&str] = &[
    "white",
    "black",
    "beige",
    "pastel pink",
    "sage green",
    "navy blue",
];

/// Pose/angle chips offered in Shot Lab: (label, instruction)
pub const POSE_ANGLES: &[(&str, &str)] = &[
    ("Bird's Eye", "Shoot from directly overhead in a bird's eye view."),
    ("Worm's Eye", "Shoot from ground level looking steeply up at the subject."),
    ("Profile", "Show the subject in a clean side profile."),
    ("Over the Shoulder", "Frame the shot over the subject's shoulder."),
    ("Walking", "Capture the subject mid-stride, walking toward the camera."),
    ("Seated", "Pose the subject seated, leaning slightly forward."),
];

/// Visual theme applied on top of the mode templates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Theme {
    ProfessionalStudio,
    Aura,
    DramaticDark,
    UrbanStreet,
    /// Any other theme label; appended to the prompt verbatim
    Custom(String),
}

impl Theme {
    /// Built-in themes in display order
    pub const BUILT_IN: [Theme; 4] = [
        Theme::ProfessionalStudio,
        Theme::Aura,
        Theme::DramaticDark,
        Theme::UrbanStreet,
    ];

    pub fn label(&self) -> &str {
        match self {
            Theme::ProfessionalStudio => "Professional Studio",
            Theme::Aura => "Aura",
            Theme::DramaticDark => "Dramatic & Dark",
            Theme::UrbanStreet => "Urban Street Style",
            Theme::Custom(label) => label,
        }
    }

    /// Name written into the prompt. The studio theme keeps the spelling the
    /// prompt templates were tuned with.
    pub fn prompt_label(&self) -> &str {
        match self {
            Theme::ProfessionalStudio => "Profesional Studio",
            other => other.label(),
        }
    }

    /// Whether a background color may be chosen with this theme
    pub fn is_color_eligible(&self) -> bool {
        matches!(self, Theme::ProfessionalStudio | Theme::Aura)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Theme {
    type Err = LookbookError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err(LookbookError::ParseError("Theme name is empty".to_string())),
            "professional studio" | "profesional studio" | "studio" => {
                Ok(Theme::ProfessionalStudio)
            }
            "aura" => Ok(Theme::Aura),
            "dramatic & dark" | "dramatic and dark" | "dramatic-dark" => Ok(Theme::DramaticDark),
            "urban street style" | "urban street" | "urban" => Ok(Theme::UrbanStreet),
            _ => Ok(Theme::Custom(trimmed.to_string())),
        }
    }
}

/// The user's current style choices.
///
/// `color` is only ever set while the theme is color-eligible; the setters
/// maintain that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSelection {
    theme: Option<Theme>,
    color: Option<String>,
    lighting: Option<String>,
    camera_lens: Option<String>,
    pose_angle: Option<String>,
    description: String,
}

impl StyleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn lighting(&self) -> Option<&str> {
        self.lighting.as_deref()
    }

    pub fn camera_lens(&self) -> Option<&str> {
        self.camera_lens.as_deref()
    }

    pub fn pose_angle(&self) -> Option<&str> {
        self.pose_angle.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Select (or clear) the theme. Drops the color unless the new theme
    /// accepts one.
    pub fn set_theme(&mut self, theme: Option<Theme>) {
        if !theme.as_ref().is_some_and(Theme::is_color_eligible) {
            self.color = None;
        }
        self.theme = theme;
    }

    /// Select (or clear) the background color. Returns false, leaving the
    /// selection untouched, when the current theme takes no color.
    pub fn set_color(&mut self, color: Option<String>) -> bool {
        if color.is_some() && !self.theme.as_ref().is_some_and(Theme::is_color_eligible) {
            return false;
        }
        self.color = color;
        true
    }

    pub fn set_lighting(&mut self, lighting: Option<String>) {
        self.lighting = lighting;
    }

    pub fn set_camera_lens(&mut self, lens: Option<String>) {
        self.camera_lens = lens;
    }

    /// Toggle a pose/angle chip: picking the active instruction again
    /// deselects it. Returns whether a chip is active afterwards.
    pub fn toggle_pose_angle(&mut self, instruction: &str) -> bool {
        if self.pose_angle.as_deref() == Some(instruction) {
            self.pose_angle = None;
        } else {
            self.pose_angle = Some(instruction.to_string());
        }
        self.pose_angle.is_some()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-item facts only known while a batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerContext {
    /// Index of the item within the batch
    pub index: usize,
    /// Whether a model/subject asset accompanies the request
    pub model_present: bool,
}

/// Theme step: replace or extend the base prompt
pub fn apply_theme(base: &str, style: &StyleSelection, ctx: LayerContext) -> String {
    let Some(theme) = style.theme() else {
        return base.to_string();
    };
    match theme {
        Theme::Aura => {
            let mut prompt = AURA_TEMPLATE.to_string();
            if let Some(color) = style.color() {
                prompt.push_str(&format!("The background color is {}. ", color));
            }
            prompt
        }
        Theme::DramaticDark => DRAMATIC_DARK_TEMPLATE.to_string(),
        Theme::UrbanStreet => {
            let templates = prompt::lifestyle_prompts(ctx.model_present);
            templates[ctx.index % templates.len()].clone()
        }
        Theme::ProfessionalStudio | Theme::Custom(_) => {
            let mut prompt = format!("{}The style and theme is \"{}\". ", base, theme.prompt_label());
            if *theme == Theme::ProfessionalStudio {
                if let Some(color) = style.color() {
                    prompt.push_str(&format!("Use a {} background. ", color));
                }
            }
            prompt
        }
    }
}

pub fn apply_lighting(prompt: String, style: &StyleSelection) -> String {
    match style.lighting() {
        Some(lighting) => format!("{}The lighting is \"{}\". ", prompt, lighting),
        None => prompt,
    }
}

pub fn apply_camera_lens(prompt: String, style: &StyleSelection) -> String {
    match style.camera_lens() {
        Some(lens) => format!("{}Shot with a {}. ", prompt, lens),
        None => prompt,
    }
}

pub fn apply_description(prompt: String, style: &StyleSelection) -> String {
    let description = style.description().trim();
    if description.is_empty() {
        prompt
    } else {
        format!("{}Concept: \"{}\". ", prompt, description)
    }
}

pub fn apply_technical_suffix(prompt: String) -> String {
    prompt + TECHNICAL_SUFFIX
}

/// Run the full modifier chain over a base template
pub fn finalize_prompt(base: &str, style: &StyleSelection, ctx: LayerContext) -> String {
    let prompt = apply_theme(base, style, ctx);
    let prompt = apply_lighting(prompt, style);
    let prompt = apply_camera_lens(prompt, style);
    let prompt = apply_description(prompt, style);
    apply_technical_suffix(prompt)
}
