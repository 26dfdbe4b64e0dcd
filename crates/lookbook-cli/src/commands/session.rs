//! `lookbook session` - interactive studio shell

use anyhow::{bail, Result};
use lookbook_core::Mode;
use lookbook_gen::style::{CAMERA_LENSES, LIGHTING_OPTIONS, STUDIO_COLORS};
use lookbook_gen::{CredentialRequest, GenerationBatch, SlotId, Studio, Theme};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::{open_studio, pick, pose_instruction, print_report};

const HELP: &str = "\
Commands:
  mode <spotlight|lifestyle|shot-lab>   switch mode (clears results and style)
  asset <slot> <path>                   upload an image (product, model, other-product, reference, background)
  remove <slot>                         remove an uploaded image
  theme <name|none>                     select a theme
  color <name|none>                     background color (Professional Studio, Aura)
  lighting <name|none>                  lighting preset
  lens <name|none>                      camera lens
  pose <label>                          toggle a Shot Lab pose/angle chip
  describe <text>                       concept text (empty to clear)
  prompts                               show the prompts a run would send
  generate | regenerate                 run a batch
  undo | redo                           move through result history
  show                                  list the current results
  save [dir]                            write the current results to disk
  key                                   enter a new API key
  status                                show mode, uploads and style
  help                                  this text
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run(provider: Option<&str>) -> Result<()> {
    let mut studio = open_studio(provider)?;
    println!("Lookbook studio ({} provider). Type 'help' for commands.", studio.provider_name());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", studio.mode().key());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        match execute(&mut studio, &line?) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("  {}", e),
        }
    }
    Ok(())
}

/// Run one shell command against the session
pub fn execute(studio: &mut Studio, line: &str) -> Result<Flow> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => println!("{}", HELP),
        "mode" => {
            let mode: Mode = rest.parse()?;
            studio.switch_mode(mode);
            println!("  Mode: {}", mode);
        }
        "asset" => {
            let Some((name, path)) = rest.split_once(char::is_whitespace) else {
                bail!("Usage: asset <slot> <path>");
            };
            let slot = SlotId::resolve(name, studio.mode())?;
            studio.assets_mut().set_asset(slot, &PathBuf::from(path.trim()))?;
            println!("  {}: {}", slot.label(), path.trim());
        }
        "remove" => {
            let slot = SlotId::resolve(rest, studio.mode())?;
            if studio.assets_mut().remove(slot).is_none() {
                println!("  {} was empty", slot.label());
            }
        }
        "theme" => {
            let theme = optional(rest).map(str::parse::<Theme>).transpose()?;
            studio.style_mut().set_theme(theme);
        }
        "color" => {
            let color = optional(rest)
                .map(|c| pick(c, STUDIO_COLORS, "color"))
                .transpose()?;
            if !studio.style_mut().set_color(color) {
                bail!("A background color needs the Professional Studio or Aura theme");
            }
        }
        "lighting" => {
            let lighting = optional(rest)
                .map(|l| pick(l, LIGHTING_OPTIONS, "lighting"))
                .transpose()?;
            studio.style_mut().set_lighting(lighting);
        }
        "lens" => {
            let lens = optional(rest)
                .map(|l| pick(l, CAMERA_LENSES, "lens"))
                .transpose()?;
            studio.style_mut().set_camera_lens(lens);
        }
        "pose" => {
            let active = studio.style_mut().toggle_pose_angle(pose_instruction(rest)?);
            println!("  Pose {}", if active { "selected" } else { "cleared" });
        }
        "describe" => studio.style_mut().set_description(rest),
        "prompts" => {
            for (i, prompt) in studio.prompts().iter().enumerate() {
                println!("  [{}] {}", i + 1, prompt);
            }
        }
        "generate" | "regenerate" => {
            let report = studio.generate()?;
            print_report(&report);
            print_batch(studio.current());
        }
        "undo" => match studio.undo() {
            Some(batch) => print_batch(batch),
            None => println!("  Nothing to undo"),
        },
        "redo" => match studio.redo() {
            Some(batch) => print_batch(batch),
            None => println!("  Nothing to redo"),
        },
        "show" => print_batch(studio.current()),
        "save" => {
            let dir = match optional(rest) {
                Some(dir) => PathBuf::from(dir),
                None => PathBuf::from(&studio.settings().output_dir),
            };
            let written = studio.export_current(&dir)?;
            if written.is_empty() {
                println!("  Nothing to save");
            }
            for path in written {
                println!("  Saved: {}", path.display());
            }
        }
        "key" => match studio.request_credentials() {
            CredentialRequest::Selected => println!("  API key updated"),
            CredentialRequest::Dismissed => println!("  API key unchanged"),
            request @ CredentialRequest::Unavailable => {
                println!("  {}", request.message().unwrap_or_default())
            }
        },
        "status" => print_status(studio),
        other => bail!("Unknown command '{}'. Type 'help' for commands.", other),
    }
    Ok(Flow::Continue)
}

/// `none` or an empty argument clears a selection
fn optional(arg: &str) -> Option<&str> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(arg)
    }
}

fn print_batch(batch: &GenerationBatch) {
    if batch.is_empty() {
        println!("  No results");
        return;
    }
    for (n, generated) in batch.images.iter().enumerate() {
        println!(
            "  generated_photo_{}.{}  (item {}, {} bytes base64)",
            n + 1,
            generated.image.extension(),
            generated.item_index + 1,
            generated.image.payload().len()
        );
    }
}

fn print_status(studio: &Studio) {
    println!("  Mode: {}", studio.mode());
    for slot in studio.assets().slots() {
        println!("  Upload: {}", slot.label());
    }
    let style = studio.style();
    if let Some(theme) = style.theme() {
        println!("  Theme: {}", theme);
    }
    if let Some(color) = style.color() {
        println!("  Color: {}", color);
    }
    if let Some(lighting) = style.lighting() {
        println!("  Lighting: {}", lighting);
    }
    if let Some(lens) = style.camera_lens() {
        println!("  Lens: {}", lens);
    }
    if let Some(pose) = style.pose_angle() {
        println!("  Pose: {}", pose);
    }
    if !style.description().is_empty() {
        println!("  Concept: {}", style.description());
    }
    let history = studio.history();
    println!(
        "  History: {} batch(es), cursor {}",
        history.len(),
        history
            .cursor()
            .map_or_else(|| "-".to_string(), |c| (c + 1).to_string())
    );
}
