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

//! The repository engine: a `dists/<suite>/<component>/` tree of binary
//! and source packages, and the `Packages`/`Sources`/`Release` indices
//! generated from it.
//!
//! [config] carries the repository-wide metadata every other submodule
//! needs. [probe] shells out for file hashes, sizes, and `dpkg-deb`/`gpg`
//! invocations. [package] and [source] represent one `.deb`/`.dsc`.
//! [catalogue] maintains the in-memory `Packages`/`Sources` indices.
//! [layout] knows the directory tree and places files within it.
//! [release] emits `Release` files. [operations] composes all of the
//! above into the actions a caller actually invokes.

pub mod catalogue;
pub mod config;
pub mod layout;
pub mod operations;
pub mod package;
pub mod probe;
pub mod release;
pub mod source;

pub use catalogue::{Packages, Sources};
pub use config::{Component, RepoConfig};
pub use package::PackageRecord;
pub use source::SourceRecord;

// vim: foldmethod=marker
