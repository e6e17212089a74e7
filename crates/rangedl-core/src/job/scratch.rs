//! Deterministic scratch directory naming.
//!
//! The directory name is a pure function of the destination path, so a repeated
//! invocation for the same destination finds the segments a failed run left behind.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Prefix of every scratch directory created under the scratch root.
const SCRATCH_PREFIX: &str = "rangedl-";

/// Bytes of the readable part of the name; keeps the whole name under NAME_MAX.
const MAX_READABLE: usize = 200;

/// Scratch directory for `destination` under `scratch_root`:
/// `<root>/rangedl-<sanitized absolute path>-<16 hex of sha256(absolute path)>`.
///
/// Relative and absolute spellings of the same destination map to the same directory.
pub fn scratch_dir_for(scratch_root: &Path, destination: &Path) -> PathBuf {
    let absolute =
        std::path::absolute(destination).unwrap_or_else(|_| destination.to_path_buf());
    let text = absolute.to_string_lossy();
    let digest = Sha256::digest(text.as_bytes());
    let hash = hex::encode(&digest[..8]);
    let readable = sanitize_path_for_dir_name(&text);
    scratch_root.join(format!("{SCRATCH_PREFIX}{readable}-{hash}"))
}

/// Flattens a path into one directory-name component.
///
/// - Maps `/` and `\` to `-`, collapsing runs
/// - Replaces NUL, `:`, whitespace and control characters with `_`
/// - Trims leading/trailing `-`, `_` and `.`
/// - Limits length to `MAX_READABLE` bytes on a char boundary
fn sanitize_path_for_dir_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_dash = false;

    for c in path.chars() {
        if c == '/' || c == '\\' {
            if !prev_dash {
                out.push('-');
            }
            prev_dash = true;
            continue;
        }
        prev_dash = false;
        if c == '\0' || c == ':' || c.is_whitespace() || c.is_control() {
            out.push('_');
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '-' || c == '_' || c == '.');
    let mut take = trimmed.len().min(MAX_READABLE);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
