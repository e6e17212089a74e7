//! `rangedl clean <dest>` – discard the resume cache for a destination.

use anyhow::Result;
use rangedl_core::config::RangedlConfig;
use rangedl_core::{clean_scratch, scratch_dir};
use std::path::Path;

pub fn run_clean(cfg: &RangedlConfig, dest: &Path) -> Result<()> {
    let opts = cfg.download_options();
    if clean_scratch(dest, &opts)? {
        println!("Removed {}", scratch_dir(dest, &opts).display());
    } else {
        println!("No cached segments for {}", dest.display());
    }
    Ok(())
}
