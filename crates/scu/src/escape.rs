//! Escaping and truncation of arbitrary byte sequences into bounded,
//! printable text.
//!
//! Two distinct budgets are used throughout the runner: failure messages
//! (free text, not quoted) and pretty-printed values (quoted, escaped).
//! Both truncate gracefully rather than panicking or producing invalid
//! UTF-8 or a half-written escape sequence.

/// Maximum length, in bytes, of a failure's free-form message field.
pub const FAILURE_MESSAGE_LENGTH: usize = 2048;

/// Maximum length, in bytes, of a pretty-printed value (rendered form,
/// including surrounding quotes for string values).
pub const FAILURE_VALUE_LENGTH: usize = 256;

/// Truncates `input` to at most `capacity` bytes without splitting a UTF-8
/// code point.
pub fn truncate_to(input: &str, capacity: usize) -> String {
    if input.len() <= capacity {
        return input.to_string();
    }
    let mut end = capacity;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    input[..end].to_string()
}

/// Escapes `input` into a quoted, printable form: `\n` and `\t` for those
/// two control characters, `\xHH` for any other byte `< 0x20` or `>= 0x7f`,
/// `\\` and `\"` for a literal backslash or double quote, and the byte
/// as-is otherwise. The result is wrapped in a quote pair and truncated to
/// fit `capacity` bytes total (including both quotes) without ever emitting
/// a partial escape sequence — the closing quote is always present.
pub fn escape_quoted(input: &[u8], capacity: usize) -> String {
    let mut out = String::with_capacity(capacity.min(input.len().saturating_add(2)));
    out.push('"');

    for &byte in input {
        let piece: std::borrow::Cow<'static, str> = match byte {
            b'\\' => "\\\\".into(),
            b'"' => "\\\"".into(),
            b'\n' => "\\n".into(),
            b'\t' => "\\t".into(),
            0x00..=0x1f | 0x7f..=0xff => format!("\\x{byte:02x}").into(),
            printable => String::from(printable as char).into(),
        };

        // Reserve one byte for the closing quote so it is never dropped.
        if out.len() + piece.len() + 1 > capacity {
            break;
        }
        out.push_str(&piece);
    }

    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_and_special_chars() {
        let input: &[u8] = b"\n\t\"\\\x01x";
        let got = escape_quoted(input, FAILURE_VALUE_LENGTH);
        assert_eq!(got, "\"\\n\\t\\\"\\\\\\x01x\"");
    }

    #[test]
    fn closes_quote_even_when_truncated() {
        let input: &[u8] = b"hello world";
        let got = escape_quoted(input, 5);
        assert!(got.starts_with('"'));
        assert!(got.ends_with('"'));
        assert!(got.len() <= 5);
    }

    #[test]
    fn does_not_split_an_escape_sequence_when_truncating() {
        // Capacity lands mid-way through what would be a `\xHH` escape;
        // the whole escape must be dropped, not emitted partially.
        let input: &[u8] = b"ab\x01";
        let got = escape_quoted(input, 5);
        assert_eq!(got, "\"ab\"");
    }

    #[test]
    fn truncate_to_respects_char_boundaries() {
        let input = "héllo";
        let got = truncate_to(input, 2);
        assert!(got.len() <= 2);
        assert!(std::str::from_utf8(got.as_bytes()).is_ok());
    }
}
