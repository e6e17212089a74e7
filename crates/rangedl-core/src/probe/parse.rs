//! Extract `Content-Length` from collected header lines.

/// Returns the `Content-Length` of the last response in `lines`.
///
/// With redirects curl reports the headers of every hop; a status line
/// (`HTTP/...`) starts a new response and discards what came before.
pub(crate) fn parse_content_length(lines: &[String]) -> Option<u64> {
    let mut content_length = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    content_length
}
