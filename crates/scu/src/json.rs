//! A minimal JSON token emitter.
//!
//! Writes directly to a raw file descriptor with `write(2)` calls and no
//! intermediate document model — deliberately not `serde_json`, which would
//! require building a `Value` tree for every event just to throw it away
//! after one `write()`. This mirrors the protocol library the rest of this
//! crate's event writer is modeled on: object/array delimiters, keys, and
//! primitive values are each written as they're produced.

use std::os::fd::RawFd;

use nix::unistd::write;

/// Escapes a string for embedding inside a JSON string literal. Only the
/// three characters JSON itself requires are handled: backslash, double
/// quote, and newline. This is intentionally narrower than
/// [`crate::escape::escape_quoted`] — a pretty-printed value produced by
/// that richer escaper is escaped *again* at this layer when embedded as a
/// JSON `value` field, so a literal backslash it already emitted becomes
/// `\\\\` here. That double layering matches the wire format this protocol
/// reproduces.
fn json_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Writes one JSON object, field-by-field, directly to a file descriptor.
///
/// A `Writer` corresponds to exactly one line of output: [`Writer::finish`]
/// writes the closing brace and a trailing newline.
pub struct Writer {
    fd: RawFd,
    buf: String,
    first_field: bool,
}

impl Writer {
    /// Begins a new JSON object targeting `fd`.
    pub fn new(fd: RawFd) -> Self {
        let mut w = Self {
            fd,
            buf: String::new(),
            first_field: true,
        };
        w.buf.push('{');
        w
    }

    fn field_sep(&mut self) {
        if !self.first_field {
            self.buf.push(',');
        }
        self.first_field = false;
    }

    fn key(&mut self, key: &str) {
        self.field_sep();
        self.buf.push('"');
        self.buf.push_str(&json_escape(key));
        self.buf.push_str("\":");
    }

    /// Writes a string-valued field.
    pub fn str_field(&mut self, key: &str, value: &str) -> &mut Self {
        self.key(key);
        self.buf.push('"');
        self.buf.push_str(&json_escape(value));
        self.buf.push('"');
        self
    }

    /// Writes an integer-valued field in decimal.
    pub fn int_field(&mut self, key: &str, value: i64) -> &mut Self {
        self.key(key);
        self.buf.push_str(&value.to_string());
        self
    }

    /// Writes a real-valued field.
    pub fn real_field(&mut self, key: &str, value: f64) -> &mut Self {
        self.key(key);
        self.buf.push_str(&format!("{value:.6}"));
        self
    }

    /// Writes a boolean-valued field.
    pub fn bool_field(&mut self, key: &str, value: bool) -> &mut Self {
        self.key(key);
        self.buf.push_str(if value { "true" } else { "false" });
        self
    }

    /// Writes a field whose value is a string array.
    pub fn str_array_field(&mut self, key: &str, values: impl IntoIterator<Item = impl AsRef<str>>) -> &mut Self {
        self.key(key);
        self.buf.push('[');
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.buf.push('"');
            self.buf.push_str(&json_escape(v.as_ref()));
            self.buf.push('"');
        }
        self.buf.push(']');
        self
    }

    /// Starts an array-valued field, returning an [`ArrayWriter`] for its
    /// elements. The caller must call [`ArrayWriter::finish`] before using
    /// `self` again.
    pub fn array_field(&mut self, key: &str) -> ArrayWriter<'_> {
        self.key(key);
        self.buf.push('[');
        ArrayWriter {
            writer: self,
            first_element: true,
        }
    }

    /// Writes the closing brace, a trailing newline, and flushes the whole
    /// line to the file descriptor in one `write(2)` call.
    pub fn finish(mut self) {
        self.buf.push_str("}\n");
        let _ = write_all(self.fd, self.buf.as_bytes());
    }
}

/// Writer for the elements of an array-valued field, each of which is a
/// nested JSON object.
pub struct ArrayWriter<'a> {
    writer: &'a mut Writer,
    first_element: bool,
}

impl ArrayWriter<'_> {
    /// Writes one object element via `build`, which receives a fresh
    /// [`ObjectFields`] to populate.
    pub fn object(&mut self, build: impl FnOnce(&mut ObjectFields)) {
        if !self.first_element {
            self.writer.buf.push(',');
        }
        self.first_element = false;
        self.writer.buf.push('{');
        let mut fields = ObjectFields {
            buf: &mut self.writer.buf,
            first_field: true,
        };
        build(&mut fields);
        self.writer.buf.push('}');
    }

    /// Closes the array.
    pub fn finish(self) {
        self.writer.buf.push(']');
    }
}

/// Field writer for a nested object inside an array, as used for
/// `failures[]` and `assert_method_values[]`.
pub struct ObjectFields<'a> {
    buf: &'a mut String,
    first_field: bool,
}

impl ObjectFields<'_> {
    fn key(&mut self, key: &str) {
        if !self.first_field {
            self.buf.push(',');
        }
        self.first_field = false;
        self.buf.push('"');
        self.buf.push_str(&json_escape(key));
        self.buf.push_str("\":");
    }

    /// Writes a string-valued field.
    pub fn str_field(&mut self, key: &str, value: &str) -> &mut Self {
        self.key(key);
        self.buf.push('"');
        self.buf.push_str(&json_escape(value));
        self.buf.push('"');
        self
    }

    /// Writes an integer-valued field.
    pub fn int_field(&mut self, key: &str, value: i64) -> &mut Self {
        self.key(key);
        self.buf.push_str(&value.to_string());
        self
    }

    /// Writes a boolean-valued field.
    pub fn bool_field(&mut self, key: &str, value: bool) -> &mut Self {
        self.key(key);
        self.buf.push_str(if value { "true" } else { "false" });
        self
    }

    /// Writes an array of `{name, value?}` objects, used for
    /// `assert_method_values[]`. `value` is omitted from an element when
    /// its slot is `None`, matching the original runner's convention of
    /// skipping an empty value buffer rather than emitting `null`.
    pub fn object_array_field<'b>(
        &mut self,
        key: &str,
        items: impl IntoIterator<Item = (&'b str, Option<&'b str>)>,
    ) -> &mut Self {
        self.key(key);
        self.buf.push('[');
        for (i, (name, value)) in items.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.buf.push('{');
            self.buf.push_str("\"name\":\"");
            self.buf.push_str(&json_escape(name));
            self.buf.push('"');
            if let Some(value) = value {
                self.buf.push_str(",\"value\":\"");
                self.buf.push_str(&json_escape(value));
                self.buf.push('"');
            }
            self.buf.push('}');
        }
        self.buf.push(']');
        self
    }
}

/// Retries `write(2)` until the whole buffer has been written.
fn write_all(fd: RawFd, mut buf: &[u8]) -> nix::Result<()> {
    while !buf.is_empty() {
        let n = write(unsafe { std::os::fd::BorrowedFd::borrow_raw(fd) }, buf)?;
        buf = &buf[n..];
    }
    Ok(())
}
