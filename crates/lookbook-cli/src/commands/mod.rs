//! CLI command implementations

pub mod generate;
pub mod options;
pub mod prompts;
pub mod session;

use anyhow::{bail, Result};
use clap::Args;
use lookbook_core::Mode;
use lookbook_gen::style::{CAMERA_LENSES, LIGHTING_OPTIONS, POSE_ANGLES, STUDIO_COLORS};
use lookbook_gen::{GenerateReport, LookbookConfig, SlotId, Studio, StyleSelection, Theme};
use std::path::PathBuf;

use crate::key_prompt::TerminalKeyPrompt;

/// Style flags shared by `prompts` and `generate`
#[derive(Args, Debug, Default, Clone)]
pub struct StyleArgs {
    /// Theme (Professional Studio, Aura, "Dramatic & Dark", Urban Street Style, or any label)
    #[arg(long)]
    pub theme: Option<String>,

    /// Background color (Professional Studio and Aura only)
    #[arg(long)]
    pub color: Option<String>,

    /// Lighting preset
    #[arg(long)]
    pub lighting: Option<String>,

    /// Camera lens
    #[arg(long)]
    pub lens: Option<String>,

    /// Shot Lab pose/angle chip
    #[arg(long)]
    pub pose: Option<String>,

    /// Free-text concept appended to every prompt
    #[arg(long, short)]
    pub describe: Option<String>,
}

impl StyleArgs {
    pub fn apply(&self, style: &mut StyleSelection) -> Result<()> {
        if let Some(theme) = &self.theme {
            style.set_theme(Some(theme.parse::<Theme>()?));
        }
        if let Some(color) = &self.color {
            let color = pick(color, STUDIO_COLORS, "color")?;
            if !style.set_color(Some(color)) {
                bail!("A background color needs the Professional Studio or Aura theme");
            }
        }
        if let Some(lighting) = &self.lighting {
            style.set_lighting(Some(pick(lighting, LIGHTING_OPTIONS, "lighting")?));
        }
        if let Some(lens) = &self.lens {
            style.set_camera_lens(Some(pick(lens, CAMERA_LENSES, "lens")?));
        }
        if let Some(pose) = &self.pose {
            style.toggle_pose_angle(pose_instruction(pose)?);
        }
        if let Some(describe) = &self.describe {
            style.set_description(describe.as_str());
        }
        Ok(())
    }
}

/// Load layered config, apply the `--provider` override and open a session
pub fn open_studio(provider: Option<&str>) -> Result<Studio> {
    let mut config = LookbookConfig::load()?;
    if let Some(name) = provider {
        config.provider.name = name.to_string();
    }
    let studio = Studio::from_config(&config)?.with_credential_prompt(Box::new(TerminalKeyPrompt));
    tracing::info!(provider = studio.provider_name(), "session opened");
    Ok(studio)
}

/// Parse `slot=path` as given to `--asset`
pub fn parse_asset_arg(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((slot, path)) if !slot.trim().is_empty() && !path.trim().is_empty() => {
            Ok((slot.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected slot=path, got '{}'", s)),
    }
}

/// Upload each `slot=path` pair into the studio
pub fn load_assets(studio: &mut Studio, assets: &[(String, PathBuf)]) -> Result<()> {
    let mode = studio.mode();
    for (name, path) in assets {
        let slot = SlotId::resolve(name, mode)?;
        studio.assets_mut().set_asset(slot, path)?;
    }
    Ok(())
}

/// Case-insensitive lookup of a preset value
pub fn pick(value: &str, options: &[&str], what: &str) -> Result<String> {
    let wanted = value.trim().to_lowercase();
    match options.iter().find(|o| o.to_lowercase() == wanted) {
        Some(found) => Ok(found.to_string()),
        None => bail!(
            "Unknown {} '{}'. Available: {}",
            what,
            value,
            options.join(", ")
        ),
    }
}

/// Resolve a pose chip label to its instruction
pub fn pose_instruction(label: &str) -> Result<&'static str> {
    let wanted = label.trim().to_lowercase();
    POSE_ANGLES
        .iter()
        .find(|(l, _)| l.to_lowercase() == wanted)
        .map(|(_, instruction)| *instruction)
        .ok_or_else(|| {
            let labels: Vec<&str> = POSE_ANGLES.iter().map(|(l, _)| *l).collect();
            anyhow::anyhow!("Unknown pose '{}'. Available: {}", label, labels.join(", "))
        })
}

pub fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.to_string())
}

/// Print the outcome of a generate request
pub fn print_report(report: &GenerateReport) {
    if report.produced > 0 {
        println!("  Generated {} image(s)", report.produced);
    }
    if !report.skipped.is_empty() {
        let items: Vec<String> = report.skipped.iter().map(|i| (i + 1).to_string()).collect();
        println!("  No image for item(s): {}", items.join(", "));
    }
    if let Some(notification) = &report.notification {
        eprintln!("  {}", notification);
    }
}
