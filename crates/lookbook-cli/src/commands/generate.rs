//! `lookbook generate` - one batch, written to disk

use anyhow::{bail, Result};
use clap::Args;
use lookbook_core::Mode;
use std::path::PathBuf;

use super::{load_assets, open_studio, parse_asset_arg, parse_mode, print_report, StyleArgs};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Mode: spotlight, lifestyle, shot-lab
    #[arg(value_parser = parse_mode)]
    pub mode: Mode,

    /// Upload as slot=path (repeatable), e.g. --asset product=bag.png --asset model=ana.jpg
    #[arg(long = "asset", value_parser = parse_asset_arg, required = true)]
    pub assets: Vec<(String, PathBuf)>,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Output directory (defaults to the configured output_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, provider: Option<&str>) -> Result<()> {
    let mut studio = open_studio(provider)?;
    studio.switch_mode(args.mode);
    load_assets(&mut studio, &args.assets)?;
    args.style.apply(studio.style_mut())?;

    println!(
        "Generating {} {} image(s) with provider '{}'...",
        studio.settings().batch_size,
        studio.mode(),
        studio.provider_name()
    );
    let report = studio.generate()?;
    print_report(&report);

    if studio.current().is_empty() {
        bail!("No images were generated");
    }

    let dir = args
        .output
        .unwrap_or_else(|| PathBuf::from(&studio.settings().output_dir));
    for path in studio.export_current(&dir)? {
        println!("  Saved: {}", path.display());
    }
    Ok(())
}
