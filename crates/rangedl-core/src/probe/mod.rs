//! Resource size probing.
//!
//! One plain GET against the target URL; only the response headers are used.
//! The body is not needed, so the transfer is cut off as soon as the first
//! body bytes arrive.

mod parse;

use std::str;

use crate::error::ProbeError;
use crate::fetcher::TransferOptions;

/// Returns the declared `Content-Length` of `url`.
///
/// Follows redirects; only the headers of the final response are considered.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn probe_content_length(url: &str, opts: &TransferOptions) -> Result<u64, ProbeError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    opts.apply(&mut easy)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        // Returning 0 aborts the transfer with a write error once the body starts.
        transfer.write_function(|_| Ok(0))?;
        if let Err(e) = transfer.perform() {
            if !e.is_write_error() {
                return Err(ProbeError::Curl(e));
            }
        }
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(ProbeError::Http(code));
    }

    let len = parse::parse_content_length(&headers).ok_or(ProbeError::MissingLength)?;
    tracing::debug!(url, content_length = len, "probe complete");
    Ok(len)
}
