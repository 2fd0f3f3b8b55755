//! Typed, bounded pretty-printing of assertion operands.

use crate::escape::{escape_quoted, truncate_to, FAILURE_VALUE_LENGTH};

/// Renders an integer value given its declared byte width (1, 2, 4, or 8).
///
/// `value` is always carried as `u64`; `width` says how many of its low
/// bytes were actually declared by the assertion macro (mirroring the C
/// runner's `typeof`-captured temporaries, which may be narrower than the
/// `long long` used to pass them through varargs). The value is masked to
/// `width` bytes, then rendered as `<unsigned> (0x<hex>)`, or, when the
/// high bit of the declared width is set, `<unsigned> (0x<hex> == <signed>)`
/// with the signed interpretation obtained by sign-extending within that
/// width.
pub fn format_integer(value: u64, width: u8) -> String {
    let bits = u32::from(width) * 8;
    let mask: u64 = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let masked = value & mask;

    if bits < 64 {
        let sign_bit = 1u64 << (bits - 1);
        if masked & sign_bit != 0 {
            // Sign-extend: set all bits above the declared width.
            let signed = (masked | !mask) as i64;
            return format!("{masked} (0x{masked:x} == {signed})");
        }
    } else if (masked as i64) < 0 {
        return format!("{masked} (0x{masked:x} == {})", masked as i64);
    }

    format!("{masked} (0x{masked:x})")
}

/// Renders a floating-point value with six decimal digits, matching the
/// original runner's `printf("%f", ...)` default.
pub fn format_float(value: f64) -> String {
    format!("{value:.6}")
}

/// Renders a raw pointer address, or the literal `NULL` when null.
pub fn format_pointer(ptr: *const ()) -> String {
    if ptr.is_null() {
        "NULL".to_string()
    } else {
        format!("{ptr:p}")
    }
}

/// The literal expected-side rendering for `ASSERT_PTR_NOT_NULL`'s failure
/// message, since there is no single address to show for "anything but
/// null".
pub const NOT_NULL_LABEL: &str = "<NOT NULL>";

/// Escapes and truncates a string value to fit [`FAILURE_VALUE_LENGTH`].
pub fn format_string(value: &str) -> String {
    escape_quoted(value.as_bytes(), FAILURE_VALUE_LENGTH)
}

/// Renders a byte buffer as a hex dump with an ASCII gutter: 16 bytes per
/// line as two-digit hex separated by spaces, a final short line padded
/// with blanks to align the gutter, then the same bytes rendered as ASCII
/// with non-printable bytes shown as `.`. The result is truncated to fit
/// [`FAILURE_VALUE_LENGTH`].
pub fn format_bytes(bytes: &[u8]) -> String {
    const PER_LINE: usize = 16;
    let mut out = String::new();

    for chunk in bytes.chunks(PER_LINE) {
        for i in 0..PER_LINE {
            if i > 0 {
                out.push(' ');
            }
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{b:02x}")),
                None => out.push_str("  "),
            }
        }
        out.push(' ');
        for &b in chunk {
            let c = if (0x20..0x7f).contains(&b) { b as char } else { '.' };
            out.push(c);
        }
        out.push('\n');
    }
    out.pop(); // drop the trailing newline after the last line

    truncate_to(&out, FAILURE_VALUE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trips_for_every_width() {
        for width in [1u8, 2, 4, 8] {
            let bits = u32::from(width) * 8;
            let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
            let minus_one_masked = mask;
            let got = format_integer((-1i64) as u64, width);
            assert_eq!(
                got,
                format!("{minus_one_masked} (0x{minus_one_masked:x} == -1)")
            );
        }
    }

    #[test]
    fn positive_integer_has_no_signed_form() {
        assert_eq!(format_integer(42, 4), "42 (0x2a)");
    }

    #[test]
    fn pointer_renders_null_and_hex() {
        assert_eq!(format_pointer(std::ptr::null()), "NULL");
        let value = 0x1234usize;
        let rendered = format_pointer(value as *const ());
        assert!(rendered.starts_with("0x"));
    }

    #[test]
    fn bytes_dump_wraps_at_sixteen_with_padding() {
        let data: Vec<u8> = (0..20u8).collect();
        let dump = format_bytes(&data);
        let mut lines = dump.lines();
        let first = lines.next().unwrap();
        let second = lines.next().unwrap();
        assert!(lines.next().is_none());
        // 16 hex pairs + 15 separating spaces + 1 gutter space + 16 ascii chars.
        assert_eq!(first.len(), 16 * 2 + 15 + 1 + 16);
        // Second line has only 4 real bytes, padded to the same hex width.
        assert_eq!(second.len(), 16 * 2 + 15 + 1 + 4);
    }
}
