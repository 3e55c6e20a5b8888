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

//! Hash & Size Probe: shells out to `md5sum`/`sha1sum`/`sha256sum`,
//! `dpkg-deb`, and `gpg` rather than linking an in-process digest crate, so
//! that the bytes this crate writes match what an operator running those
//! tools by hand would get.

use std::{path::Path, process::Command};

/// One of the three digest algorithms a `Packages`/`Sources`/`Release`
/// entry is hashed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    /// `MD5Sum:`, computed by `md5sum`.
    Md5,
    /// `SHA1:`, computed by `sha1sum`.
    Sha1,
    /// `SHA256:`, computed by `sha256sum`.
    Sha256,
}

impl HashAlgorithm {
    /// Every algorithm this crate computes, in the order they're written
    /// into a `Packages` paragraph or a suite `Release` hash block.
    pub const ALL: [HashAlgorithm; 3] =
        [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256];

    /// Control/index field name, e.g. `MD5Sum`.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5Sum",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
        }
    }

    fn command(&self) -> &'static str {
        match self {
            Self::Md5 => "md5sum",
            Self::Sha1 => "sha1sum",
            Self::Sha256 => "sha256sum",
        }
    }
}

/// Error conditions encountered while probing a file or invoking an
/// external tool.
#[derive(Debug)]
pub enum Error {
    /// Underlying i/o error spawning the external command or `stat`-ing
    /// the file.
    Io(std::io::Error),

    /// The external command exited nonzero.
    CommandFailed {
        /// Command that failed, for diagnostics.
        command: String,
        /// Its exit status.
        status: std::process::ExitStatus,
        /// Its standard error, captured for diagnostics.
        stderr: String,
    },

    /// The command produced no usable output to extract a digest from.
    EmptyOutput(String),
}
crate::errors::error_enum!(Error);

/// Size, in bytes, of the file at `path`.
pub fn size(path: &Path) -> Result<u64, Error> {
    std::fs::metadata(path).map(|m| m.len()).map_err(Error::Io)
}

/// Run the external digest command for `algorithm` over `path`, returning
/// the first whitespace-delimited token of its stdout: the ascii-hex
/// digest.
pub fn digest(algorithm: HashAlgorithm, path: &Path) -> Result<String, Error> {
    let command = algorithm.command();
    let output = Command::new(command).arg(path).output().map_err(Error::Io)?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: command.to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .next()
        .map(str::to_owned)
        .ok_or_else(|| Error::EmptyOutput(command.to_owned()))
}

/// Extract the control paragraph of a `.deb` via `dpkg-deb -I <deb>
/// control`. Per spec, if the tool exits nonzero, parsing still proceeds
/// on whatever made it to standard output, so this does not itself check
/// the exit status.
pub fn deb_control(path: &Path) -> Result<String, Error> {
    let output = Command::new("dpkg-deb")
        .arg("-I")
        .arg(path)
        .arg("control")
        .output()
        .map_err(Error::Io)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Decrypt a PGP clearsigned `.dsc`, returning the enclosed cleartext.
pub fn gpg_decrypt(path: &Path) -> Result<String, Error> {
    let output = Command::new("gpg")
        .arg("--decrypt")
        .arg(path)
        .output()
        .map_err(Error::Io)?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: "gpg --decrypt".to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Detached-sign `input`, writing an ascii-armoured signature to `output`.
/// Any pre-existing `output` is removed first.
pub fn gpg_sign(input: &Path, output: &Path) -> Result<(), Error> {
    if output.exists() {
        std::fs::remove_file(output).map_err(Error::Io)?;
    }
    let result = Command::new("gpg")
        .args(["-a", "-b", "--sign", "-o"])
        .arg(output)
        .arg(input)
        .output()
        .map_err(Error::Io)?;
    if !result.status.success() {
        return Err(Error::CommandFailed {
            command: "gpg --sign".to_owned(),
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_index_headings() {
        assert_eq!("MD5Sum", HashAlgorithm::Md5.field_name());
        assert_eq!("SHA1", HashAlgorithm::Sha1.field_name());
        assert_eq!("SHA256", HashAlgorithm::Sha256.field_name());
    }

    #[test]
    fn size_of_missing_file_errors() {
        assert!(size(Path::new("/nonexistent/does/not/exist")).is_err());
    }

    #[test]
    fn digest_of_known_bytes() {
        if which::which("md5sum").is_err() {
            eprintln!("skipping: md5sum not found");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world\n").unwrap();
        let got = digest(HashAlgorithm::Md5, &path).unwrap();
        assert_eq!("6f5902ac237024bdd0c176cb93063dc4", got);
    }
}

// vim: foldmethod=marker
