//! Streaming JSON sink built on serde_json's low-level `Formatter`.
//!
//! The serializer drives this sink with begin/end container calls, field
//! names, and scalar values. The sink tracks which container is open and
//! whether its next entry is the first one, and hands `serde_json`'s
//! [`PrettyFormatter`] the positioning information it needs to produce
//! commas and indentation. Escaping matches `serde_json` output exactly.

use std::io::{self, Write};

use serde_json::ser::{CharEscape, Formatter, PrettyFormatter};

enum Container {
    Object { first: bool },
    Array { first: bool },
}

/// Indented JSON writer emitting exactly one top-level value.
pub struct JsonWriter<W: Write> {
    out: W,
    fmt: PrettyFormatter<'static>,
    open: Vec<Container>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fmt: PrettyFormatter::new(),
            open: Vec::new(),
        }
    }

    pub fn begin_object(&mut self) -> io::Result<()> {
        self.before_value()?;
        self.fmt.begin_object(&mut self.out)?;
        self.open.push(Container::Object { first: true });
        Ok(())
    }

    pub fn end_object(&mut self) -> io::Result<()> {
        self.open.pop();
        self.fmt.end_object(&mut self.out)?;
        self.after_value()
    }

    pub fn begin_array(&mut self) -> io::Result<()> {
        self.before_value()?;
        self.fmt.begin_array(&mut self.out)?;
        self.open.push(Container::Array { first: true });
        Ok(())
    }

    pub fn end_array(&mut self) -> io::Result<()> {
        self.open.pop();
        self.fmt.end_array(&mut self.out)?;
        self.after_value()
    }

    /// Writes the name of the next object member. Must be followed by exactly
    /// one value call.
    pub fn field_name(&mut self, name: &str) -> io::Result<()> {
        let first = match self.open.last_mut() {
            Some(Container::Object { first }) => std::mem::replace(first, false),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "field name written outside of an object",
                ));
            }
        };
        self.fmt.begin_object_key(&mut self.out, first)?;
        self.write_escaped(name)?;
        self.fmt.end_object_key(&mut self.out)?;
        self.fmt.begin_object_value(&mut self.out)
    }

    pub fn string_value(&mut self, value: &str) -> io::Result<()> {
        self.before_value()?;
        self.write_escaped(value)?;
        self.after_value()
    }

    pub fn number_value(&mut self, value: i32) -> io::Result<()> {
        self.before_value()?;
        self.fmt.write_i32(&mut self.out, value)?;
        self.after_value()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Positions an array element; object member values are already
    /// positioned by [`field_name`](JsonWriter::field_name).
    fn before_value(&mut self) -> io::Result<()> {
        if let Some(Container::Array { first }) = self.open.last_mut() {
            let first = std::mem::replace(first, false);
            self.fmt.begin_array_value(&mut self.out, first)?;
        }
        Ok(())
    }

    fn after_value(&mut self) -> io::Result<()> {
        match self.open.last() {
            Some(Container::Array { .. }) => self.fmt.end_array_value(&mut self.out),
            Some(Container::Object { .. }) => self.fmt.end_object_value(&mut self.out),
            None => Ok(()),
        }
    }

    fn write_escaped(&mut self, value: &str) -> io::Result<()> {
        self.fmt.begin_string(&mut self.out)?;
        let bytes = value.as_bytes();
        let mut start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let escape = match byte {
                b'"' => CharEscape::Quote,
                b'\\' => CharEscape::ReverseSolidus,
                0x08 => CharEscape::Backspace,
                0x0C => CharEscape::FormFeed,
                b'\n' => CharEscape::LineFeed,
                b'\r' => CharEscape::CarriageReturn,
                b'\t' => CharEscape::Tab,
                0x00..=0x1F => CharEscape::AsciiControl(byte),
                _ => continue,
            };
            if start < i {
                self.fmt.write_string_fragment(&mut self.out, &value[start..i])?;
            }
            self.fmt.write_char_escape(&mut self.out, escape)?;
            start = i + 1;
        }
        if start < bytes.len() {
            self.fmt.write_string_fragment(&mut self.out, &value[start..])?;
        }
        self.fmt.end_string(&mut self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut JsonWriter<&mut Vec<u8>>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        let mut w = JsonWriter::new(&mut buf);
        f(&mut w).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_object_with_mixed_members() {
        let out = written(|w| {
            w.begin_object()?;
            w.field_name("n")?;
            w.number_value(42)?;
            w.field_name("s")?;
            w.string_value("hi")?;
            w.end_object()
        });
        assert_eq!(out, "{\n  \"n\": 42,\n  \"s\": \"hi\"\n}");
    }

    #[test]
    fn test_array_inside_object() {
        let out = written(|w| {
            w.begin_object()?;
            w.field_name("a")?;
            w.begin_array()?;
            w.number_value(1)?;
            w.string_value("x")?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    \"x\"\n  ]\n}");
    }

    #[test]
    fn test_empty_containers() {
        let out = written(|w| {
            w.begin_object()?;
            w.field_name("o")?;
            w.begin_object()?;
            w.end_object()?;
            w.field_name("a")?;
            w.begin_array()?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(out, "{\n  \"o\": {},\n  \"a\": []\n}");
    }

    #[test]
    fn test_string_escaping_matches_serde_json() {
        for input in ["plain", "a\"b\\c", "line\nbreak\ttab", "nul\u{1}ctl", "héllo"] {
            let out = written(|w| w.string_value(input));
            assert_eq!(out, serde_json::to_string(input).unwrap());
        }
    }

    #[test]
    fn test_field_name_outside_object_is_an_error() {
        let mut buf = Vec::new();
        let mut w = JsonWriter::new(&mut buf);
        assert!(w.field_name("x").is_err());
    }
}
