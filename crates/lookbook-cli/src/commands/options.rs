//! `lookbook options` - list the style presets

use anyhow::Result;
use lookbook_core::Mode;
use lookbook_gen::style::{CAMERA_LENSES, LIGHTING_OPTIONS, POSE_ANGLES, STUDIO_COLORS};
use lookbook_gen::{SlotId, Theme};

pub fn run() -> Result<()> {
    println!("Modes:");
    for mode in Mode::ALL {
        println!("  {:<10} {}", mode.key(), mode);
    }

    println!("\nSlots:");
    for slot in SlotId::ALL {
        println!("  {:<24} {}", slot.key(), slot.label());
    }

    println!("\nThemes (any other label is used as-is):");
    for theme in Theme::BUILT_IN {
        let note = if theme.is_color_eligible() {
            "  [takes a color]"
        } else {
            ""
        };
        println!("  {}{}", theme, note);
    }

    print_list("Colors", STUDIO_COLORS);
    print_list("Lighting", LIGHTING_OPTIONS);
    print_list("Lenses", CAMERA_LENSES);

    println!("\nPose/angle chips (Shot Lab):");
    for (label, instruction) in POSE_ANGLES {
        println!("  {:<18} {}", label, instruction);
    }
    Ok(())
}

fn print_list(title: &str, items: &[&str]) {
    println!("\n{}:", title);
    for item in items {
        println!("  {}", item);
    }
}
