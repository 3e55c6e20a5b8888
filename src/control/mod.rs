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

//! The `control` module contains support for parsing Debian RFC 2822-style
//! control files into our conventional formats.
//!
//! Unlike a typed, `serde`-driven decode of a known schema, [paragraph]
//! keeps every paragraph's field order and raw lines around, so a
//! paragraph read from a `.deb` control member or a `.dsc` file can be
//! rewritten into a `Packages`/`Sources` index without losing or
//! reordering anything the original author wrote.
//!
//! The small wrapper types in this module ([Architectures], [DateTime2822],
//! [SpaceDelimitedStrings], [CommaDelimitedStrings]) all implement
//! [serde::Serialize]/[serde::Deserialize] via
//! [macros::def_serde_traits_for], unconditionally.

mod architectures;
mod date_time;
mod delimited_strings;
mod macros;
pub mod paragraph;

pub use architectures::Architectures;
pub use date_time::{DateTime2822, DateTime2822ParseError};
pub use delimited_strings::{CommaDelimitedStrings, SpaceDelimitedStrings};
pub use paragraph::{Error, RawField, RawParagraph};

// vim: foldmethod=marker
