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

use std::str::FromStr;

/// Debian architecture name. This is something like `arm64`, `amd64`, or
/// `mips64el`. This can be parsed from (or converted back into) a String.
///
/// [Architecture] strings are used throughout a Debian archive to target a
/// specific CPU ISA baseline, and show up as directory names
/// (`binary-<arch>`), as fields in control files (`Architecture:`), and as
/// suffixes on `.deb` filenames.
///
/// ```
/// use debrepo::architecture::Architecture;
///
/// // Prints `arm64`
/// println!("{}", Architecture::Arm64);
///
/// let arch: Architecture = "amd64".parse().unwrap();
/// // Prints `amd64`
/// println!("{}", arch);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Architecture {
    /// Special "Any" Architecture -- valid to be built on any Debian
    /// architecture.
    Any,

    /// Special "All" Architecture -- valid for all architectures, things like
    /// text files or other files that do not rely on the host CPU ISA.
    All,

    /// Special "Source" Architecture -- this is source code to a binary
    /// package, and lives under a `source/` directory rather than a
    /// `binary-<arch>/` one.
    Source,

    /// Debian `amd64` arch.
    Amd64,

    /// Debian `arm64` arch.
    Arm64,

    /// Debian `armel` arch.
    Armel,

    /// Debian `armhf` arch.
    Armhf,

    /// Debian `i386` arch.
    I386,

    /// Debian `mips64el` arch.
    Mips64el,

    /// Debian `mipsel` arch.
    Mipsel,

    /// Debian `ppc64el` arch.
    Ppc64el,

    /// Debian `riscv64` arch.
    RiscV64,

    /// Debian `s390x` arch.
    S390X,

    /// Other Debian arch (or archive pseudo-arch) not covered by this enum
    /// at the time of its last update. Repositories routinely carry
    /// architectures this crate has never heard of, so this variant keeps
    /// parsing total rather than rejecting unknown tags.
    Other(String),
}

/// Error conditions which may be encountered when parsing a String
/// into an [Architecture].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the string provided to [Architecture] is empty.
    Empty,
}
crate::errors::error_enum!(Error);

impl Architecture {
    /// Return true if the Architecture has a specific special meaning
    /// (`any`, `all`, or `source`) rather than naming a real CPU ISA.
    pub const fn is_special(&self) -> bool {
        matches!(self, Self::Any | Self::All | Self::Source)
    }

    /// Return true if `self` is effectively the `other` [Architecture]
    /// provided.
    ///
    /// | `self`                     | `other`                    | value                  |
    /// | -------------------------- | -------------------------- | ---------------------- |
    /// | [Architecture::Amd64]      | [Architecture::Amd64]      | `true`                 |
    /// | [Architecture::Amd64]      | [Architecture::Arm64]      | `false`                |
    /// | [Architecture::Any]        | [Architecture::Arm64]      | `true`                 |
    /// | [Architecture::Arm64]      | [Architecture::Any]        | `false`                |
    /// | [Architecture::All]        | [Architecture::Arm64]      | `false`                |
    /// | [Architecture::Source]     | [Architecture::Arm64]      | `false`                |
    pub fn is(&self, other: &Architecture) -> bool {
        if self == other {
            return true;
        }
        if matches!(other, Self::Any) {
            if self.is_special() {
                return false;
            }
            return true;
        }
        false
    }

    /// Return the [Architecture] as our conventional string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "any",
            Self::All => "all",
            Self::Source => "source",
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Armel => "armel",
            Self::Armhf => "armhf",
            Self::I386 => "i386",
            Self::Mips64el => "mips64el",
            Self::Mipsel => "mipsel",
            Self::Ppc64el => "ppc64el",
            Self::RiscV64 => "riscv64",
            Self::S390X => "s390x",
            Self::Other(v) => v.as_str(),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(arch: &str) -> Result<Self, Error> {
        Ok(match arch {
            "" => return Err(Error::Empty),
            "any" => Architecture::Any,
            "all" => Architecture::All,
            "source" => Architecture::Source,
            "amd64" => Architecture::Amd64,
            "arm64" => Architecture::Arm64,
            "armel" => Architecture::Armel,
            "armhf" => Architecture::Armhf,
            "i386" => Architecture::I386,
            "mips64el" => Architecture::Mips64el,
            "mipsel" => Architecture::Mipsel,
            "ppc64el" => Architecture::Ppc64el,
            "riscv64" => Architecture::RiscV64,
            "s390x" => Architecture::S390X,
            _ => Architecture::Other(arch.to_owned()),
        })
    }
}

mod serde {
    use super::Architecture;
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Architecture {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            String::serialize(&self.to_string(), serializer)
        }
    }

    impl<'de> Deserialize<'de> for Architecture {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = String::deserialize(d)?;
            s.parse().map_err(|e| D::Error::custom(format!("{:?}", e)))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! check_is_implementation {
        ($name:ident, $left:ident is $right:ident == $val:expr) => {
            #[test]
            fn $name() {
                assert!($val == Architecture::$left.is(&Architecture::$right));
            }
        };
    }

    check_is_implementation!(is_simple_amd64_amd64, Amd64 is Amd64  == true);
    check_is_implementation!(is_simple_amd64_arm64, Amd64 is Arm64  == false);
    check_is_implementation!(is_simple_amd64_any,   Amd64 is Any    == true);

    check_is_implementation!(is_simple_any_amd64,  Any is Amd64  == false);
    check_is_implementation!(is_simple_any_all,    Any is All    == false);
    check_is_implementation!(is_simple_any_source, Any is Source == false);
    check_is_implementation!(is_simple_any_any,    Any is Any    == true);

    check_is_implementation!(is_simple_all_any,    All is Any    == false);
    check_is_implementation!(is_simple_all_all,    All is All    == true);

    #[test]
    fn parse_from_string_empty() {
        assert!("".parse::<Architecture>().is_err());
    }

    #[test]
    fn parse_special() {
        assert_eq!(Architecture::Any, "any".parse::<Architecture>().unwrap());
        assert_eq!(Architecture::All, "all".parse::<Architecture>().unwrap());
        assert_eq!(
            Architecture::Source,
            "source".parse::<Architecture>().unwrap()
        );

        assert_eq!("any", Architecture::Any.to_string());
        assert_eq!("all", Architecture::All.to_string());
        assert_eq!("source", Architecture::Source.to_string());

        assert!(Architecture::Any.is_special());
        assert!(Architecture::All.is_special());
        assert!(Architecture::Source.is_special());
    }

    #[test]
    fn parse_from_string_unknown() {
        assert_eq!(
            Architecture::Other("notarealarch".to_owned()),
            "notarealarch".parse::<Architecture>().unwrap()
        );
        assert_eq!("notarealarch", Architecture::Other("notarealarch".to_owned()).to_string());
    }

    #[test]
    fn round_trip_known_archs() {
        for arch in [
            "amd64", "arm64", "armel", "armhf", "i386", "mips64el", "mipsel", "ppc64el",
            "riscv64", "s390x",
        ] {
            let parsed: Architecture = arch.parse().unwrap();
            assert_eq!(arch, parsed.to_string());
            assert!(!matches!(parsed, Architecture::Other(_)));
        }
    }
}

// vim: foldmethod=marker
