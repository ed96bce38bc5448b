//! Line scanner for LS-8 binary text.

use tracing::debug;

use crate::error::LoadError;

/// Parse one line of program text.
///
/// Returns `Ok(None)` for blank lines, comment-only lines and lines that
/// are not a binary literal. Comments start with `#` and extend to end of
/// line. An optional `0b` prefix is accepted.
pub(crate) fn parse_line(line: &str, line_num: usize) -> Result<Option<u8>, LoadError> {
    // Strip comment
    let code = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let code = code.trim();
    let digits = code
        .strip_prefix("0b")
        .or_else(|| code.strip_prefix("0B"))
        .unwrap_or(code);

    if digits.is_empty() || !digits.bytes().all(|b| b == b'0' || b == b'1') {
        if !code.is_empty() {
            debug!(line = line_num, text = code, "skipping non-binary line");
        }
        return Ok(None);
    }

    u8::from_str_radix(digits, 2)
        .map(Some)
        .map_err(|_| LoadError::ByteOutOfRange {
            line: line_num,
            token: code.to_string(),
        })
}
