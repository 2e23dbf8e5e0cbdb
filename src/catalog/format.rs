//! JSON layout detection and an Xcode-compatible pretty printer.
//!
//! Xcode writes string catalogs with `" : "` between keys and values, two-space
//! indentation, and empty dictionaries spread over two lines. The layout of the
//! file we read is detected once and reproduced on write so that a catalog
//! survives a read/write cycle byte-for-byte.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Textual layout of a catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// `"key" : value` (Xcode) instead of `"key": value`.
    pub spaced_colon: bool,
    /// Number of spaces per nesting level.
    pub indent: usize,
    /// Forward slashes written as `\/`.
    pub escape_slashes: bool,
    /// Non-ASCII characters written as `\uXXXX` escapes.
    pub escape_non_ascii: bool,
    /// File ends with a newline.
    pub trailing_newline: bool,
}

impl Default for Layout {
    /// The layout Xcode itself produces.
    fn default() -> Self {
        Self {
            spaced_colon: true,
            indent: 2,
            escape_slashes: false,
            escape_non_ascii: false,
            trailing_newline: false,
        }
    }
}

impl Layout {
    /// Detects the layout of an existing catalog file.
    pub fn detect(text: &str) -> Self {
        let indent = text
            .lines()
            .skip(1)
            .find_map(|line| {
                let width = line.len() - line.trim_start_matches(' ').len();
                (width > 0).then_some(width)
            })
            .unwrap_or(2);

        Self {
            spaced_colon: text.contains("\" : "),
            indent,
            escape_slashes: text.contains("\\/"),
            escape_non_ascii: has_non_ascii_escape(text),
            trailing_newline: text.ends_with('\n'),
        }
    }
}

/// `true` if `text` contains a `\uXXXX` escape of a character outside ASCII.
fn has_non_ascii_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'u')
            && let Some(hex) = text.get(i + 2..i + 6)
            && u16::from_str_radix(hex, 16).is_ok_and(|unit| unit >= 0x80)
        {
            return true;
        }
        // Skip the escaped character so `\\u` is not read as an escape.
        i += 2;
    }
    false
}

/// Serializes `value` using `layout`.
pub fn to_string(value: &Value, layout: &Layout) -> Result<String, serde_json::Error> {
    let indent = vec![b' '; layout.indent];
    let formatter = CatalogFormatter {
        current_indent: 0,
        has_value: false,
        indent: &indent,
        layout,
    };

    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    if layout.trailing_newline {
        buf.push(b'\n');
    }

    String::from_utf8(buf).map_err(|e| serde::ser::Error::custom(e.to_string()))
}

struct CatalogFormatter<'a> {
    current_indent: usize,
    has_value: bool,
    indent: &'a [u8],
    layout: &'a Layout,
}

impl CatalogFormatter<'_> {
    fn write_indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.current_indent {
            writer.write_all(self.indent)?;
        }
        Ok(())
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.current_indent -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
            self.write_indent(writer)?;
        } else if self.layout.spaced_colon {
            writer.write_all(b"\n\n")?;
            self.write_indent(writer)?;
        }
        writer.write_all(bracket)
    }

    fn begin_item<W: ?Sized + io::Write>(&self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b",\n" })?;
        self.write_indent(writer)
    }
}

impl Formatter for CatalogFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_item(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_item(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(if self.layout.spaced_colon {
            b" : "
        } else {
            b": "
        })
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let escape_slash = self.layout.escape_slashes && fragment.contains('/');
        let escape_non_ascii = self.layout.escape_non_ascii && !fragment.is_ascii();
        if !escape_slash && !escape_non_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut escaped = String::with_capacity(fragment.len());
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c == '/' && escape_slash {
                escaped.push_str("\\/");
            } else if !c.is_ascii() && escape_non_ascii {
                for unit in c.encode_utf16(&mut units) {
                    escaped.push_str(&format!("\\u{unit:04x}"));
                }
            } else {
                escaped.push(c);
            }
        }
        writer.write_all(escaped.as_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const XCODE: &str = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "" : {

    },
    "Hello" : {
      "comment" : "Greeting on the home/start screen",
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Hallo"
          }
        }
      }
    }
  },
  "version" : "1.0"
}"#;

    fn roundtrip(text: &str) -> String {
        let value: Value = serde_json::from_str(text).unwrap();
        to_string(&value, &Layout::detect(text)).unwrap()
    }

    #[test]
    fn test_detect_xcode_layout() {
        let layout = Layout::detect(XCODE);
        assert_eq!(layout, Layout::default());
    }

    #[test]
    fn test_detect_compact_colon_with_newline() {
        let layout = Layout::detect("{\n    \"a\": 1\n}\n");
        assert!(!layout.spaced_colon);
        assert_eq!(layout.indent, 4);
        assert!(layout.trailing_newline);
    }

    #[test]
    fn test_xcode_layout_roundtrips_byte_for_byte() {
        assert_eq!(roundtrip(XCODE), XCODE);
    }

    #[test]
    fn test_escaped_slashes_are_preserved() {
        let text = "{\n  \"a\\/b\" : \"c\\/d\"\n}";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_escaped_non_ascii_is_preserved() {
        let text = "{\n  \"caf\\u00e9\" : \"\\u3053\\u3093 \\ud83d\\ude00 \\/ ok\"\n}";
        let layout = Layout::detect(text);
        assert!(layout.escape_non_ascii);
        assert!(layout.escape_slashes);
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_ascii_and_escaped_backslash_do_not_enable_unicode_escapes() {
        assert!(!Layout::detect("{\n  \"a\" : \"\\u0009\"\n}").escape_non_ascii);
        assert!(!Layout::detect("{\n  \"a\" : \"\\\\u00e9\"\n}").escape_non_ascii);
    }

    #[test]
    fn test_plain_pretty_json_roundtrips() {
        let text = "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let text = "{\n  \"ja\" : \"こんにちは\"\n}";
        assert_eq!(roundtrip(text), text);
    }
}
