//! `lookbook prompts` - preview the finalized prompts

use anyhow::Result;
use clap::Args;
use lookbook_core::Mode;
use std::path::PathBuf;

use super::{load_assets, open_studio, parse_asset_arg, parse_mode, StyleArgs};

#[derive(Args, Debug)]
pub struct PromptsArgs {
    /// Mode: spotlight, lifestyle, shot-lab
    #[arg(value_parser = parse_mode, default_value = "spotlight")]
    pub mode: Mode,

    /// Upload as slot=path (repeatable). Only presence matters here.
    #[arg(long = "asset", value_parser = parse_asset_arg)]
    pub assets: Vec<(String, PathBuf)>,

    #[command(flatten)]
    pub style: StyleArgs,
}

pub fn run(args: PromptsArgs, provider: Option<&str>) -> Result<()> {
    let mut studio = open_studio(provider)?;
    studio.switch_mode(args.mode);
    load_assets(&mut studio, &args.assets)?;
    args.style.apply(studio.style_mut())?;

    println!("{} prompts:", studio.mode());
    for (i, prompt) in studio.prompts().iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, prompt);
    }
    Ok(())
}
