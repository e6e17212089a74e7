//! `rangedl scratch-dir <dest>` – show where segments for a destination are cached.

use rangedl_core::config::RangedlConfig;
use rangedl_core::scratch_dir;
use std::path::Path;

pub fn run_scratch_dir(cfg: &RangedlConfig, dest: &Path) {
    println!("{}", scratch_dir(dest, &cfg.download_options()).display());
}
