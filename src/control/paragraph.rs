// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

//! Line-oriented parser for Debian control-file ("RFC 2822-like")
//! paragraphs.
//!
//! Unlike a grammar-driven parser, this one is a straightforward
//! line-by-line state machine: it exists to preserve exactly what the
//! original author wrote (heading order, the verbatim lines of every
//! field) so a paragraph read from a `.deb` control member or a `.dsc`
//! can be re-emitted into a `Packages`/`Sources` index without losing or
//! reordering anything.

/// The value half of a [RawField]: either a single trimmed string (a
/// single-line field), or an ordered list of trimmed strings (a
/// multi-line field, recognised by an empty first-line value followed
/// by space-indented continuation lines).
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A field whose value lives entirely on the heading's own line.
    String(String),

    /// A field whose value is a list of space-indented continuation
    /// lines, such as `Files:` or `Binary:` split across multiple lines.
    List(Vec<String>),
}

impl FieldValue {
    /// Render the value the way it would appear after the `Heading:`,
    /// ignoring the preserved raw lines -- used when synthesizing new
    /// fields (e.g. `Filename`, `Size`) that have no original text.
    pub fn as_single_line(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

/// A single `Heading: value` entry within a [RawParagraph], along with
/// the exact original lines it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct RawField {
    /// Key name for the field, exactly as it appeared before the colon.
    pub key: String,

    /// Parsed value: a single string, or an ordered list for multi-line
    /// fields.
    pub value: FieldValue,

    /// Every original source line this field was parsed from, verbatim,
    /// including the trailing newline if one was present. Preserved so
    /// that re-emitting a paragraph reproduces its input byte-for-byte.
    pub lines: Vec<String>,
}

/// An ordered sequence of [RawField] entries, one per blank-line-delimited
/// control-file paragraph.
///
/// Heading order is preserved for round-trip fidelity: re-emitting a
/// [RawParagraph] by concatenating each field's `lines` reproduces the
/// input exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawParagraph {
    /// Fields, in first-occurrence order.
    pub fields: Vec<RawField>,
}

/// Error conditions which may be encountered when working with a
/// [RawParagraph].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A non-blank, non-continuation line had no `:` separator, so no
    /// heading could be extracted from it.
    Malformed,
}
crate::errors::error_enum!(Error);

impl RawParagraph {
    /// Parse every blank-line-delimited paragraph out of `text`, in
    /// order. Consecutive blank lines collapse; a run of blank lines
    /// at the start or end of `text` produces no empty paragraphs.
    pub fn parse_all(text: &str) -> Result<Vec<RawParagraph>, Error> {
        let mut paragraphs = vec![];
        let mut current = RawParagraph::default();

        for raw_line in split_keeping_newlines(text) {
            let trimmed_end = raw_line.trim_end_matches(['\n', '\r']);

            if trimmed_end.is_empty() {
                if !current.fields.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
                continue;
            }

            if trimmed_end.starts_with(' ') || trimmed_end.starts_with('\t') {
                // Continuation line: belongs to the previous heading, if
                // there is one. A continuation line with no prior
                // heading is dropped, per the paragraph grammar.
                if let Some(field) = current.fields.last_mut() {
                    field.lines.push(raw_line.to_owned());
                    let text = trimmed_end.trim_start();
                    match &mut field.value {
                        FieldValue::List(items) => items.push(text.to_owned()),
                        FieldValue::String(s) => {
                            if !s.is_empty() {
                                s.push(' ');
                            }
                            s.push_str(text);
                        }
                    }
                }
                continue;
            }

            let Some(colon) = trimmed_end.find(':') else {
                return Err(Error::Malformed);
            };
            let key = trimmed_end[..colon].to_owned();
            let value = trimmed_end[colon + 1..].trim();

            let field_value = if value.is_empty() {
                FieldValue::List(vec![])
            } else {
                FieldValue::String(value.to_owned())
            };

            current.fields.push(RawField {
                key,
                value: field_value,
                lines: vec![raw_line.to_owned()],
            });
        }

        if !current.fields.is_empty() {
            paragraphs.push(current);
        }

        Ok(paragraphs)
    }

    /// Parse a single paragraph. Convenience wrapper around
    /// [RawParagraph::parse_all] for callers that know their input holds
    /// exactly one paragraph (e.g. a single `.deb` control member).
    pub fn parse(text: &str) -> Result<RawParagraph, Error> {
        Ok(RawParagraph::parse_all(text)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// Iterate over all fields, in heading order.
    pub fn iter(&self) -> impl Iterator<Item = &RawField> {
        self.fields.iter()
    }

    /// Return all matching [RawField] by the field's key.
    pub fn field<'field>(
        &'field self,
        field_name: &'field str,
    ) -> impl Iterator<Item = &'field RawField> {
        self.fields.iter().filter(move |f| f.key == field_name)
    }

    /// Return the single-line string value of the first field matching
    /// `field_name`, if any.
    pub fn value(&self, field_name: &str) -> Option<&str> {
        self.field(field_name)
            .next()
            .and_then(|f| f.value.as_single_line())
    }

    /// Concatenate every field's preserved raw lines, in order. For a
    /// paragraph produced by [RawParagraph::parse_all], this reproduces
    /// the original input for that paragraph exactly.
    pub fn to_preserved_text(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            for line in &field.lines {
                out.push_str(line);
            }
        }
        out
    }
}

/// Split `text` into lines, keeping the trailing `\n` (and any `\r`)
/// attached to each line -- unlike [str::lines], which discards it. The
/// final line is kept even if it has no trailing newline.
fn split_keeping_newlines(text: &str) -> Vec<&str> {
    let mut lines = vec![];
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}


// vim: foldmethod=marker
