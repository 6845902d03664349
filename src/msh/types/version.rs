//! MSH format-version registry.
//!
//! Maps the decimal version found in a `$MeshFormat` header (or implied by a
//! legacy `$NOD` section) onto the closed set of format generations this
//! crate knows about, and from there onto the section-parser family that
//! handles the rest of the file.

use std::fmt;

use super::error::{MshError, Result};

/// A recognized MSH format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MshVersion {
    V1_0,
    V2_0,
    V2_1,
    V2_2,
    V4_0,
    V4_1,
}

/// The structural generation a version belongs to.
///
/// Versions inside one family share a section grammar, so the dispatcher
/// only needs the family to pick its parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionFamily {
    V1,
    V2,
    V4,
}

impl MshVersion {
    /// Every version the registry can name.
    pub const RECOGNIZED: &'static [MshVersion] = &[
        MshVersion::V1_0,
        MshVersion::V2_0,
        MshVersion::V2_1,
        MshVersion::V2_2,
        MshVersion::V4_0,
        MshVersion::V4_1,
    ];

    /// Versions the parser is currently willing to read.
    ///
    /// Kept separate from [`RECOGNIZED`](Self::RECOGNIZED) so a version can
    /// be retired without becoming "unknown".
    pub const SUPPORTED: &'static [MshVersion] = &[
        MshVersion::V1_0,
        MshVersion::V2_0,
        MshVersion::V2_1,
        MshVersion::V2_2,
        MshVersion::V4_0,
        MshVersion::V4_1,
    ];

    pub fn major(&self) -> u32 {
        match self {
            MshVersion::V1_0 => 1,
            MshVersion::V2_0 | MshVersion::V2_1 | MshVersion::V2_2 => 2,
            MshVersion::V4_0 | MshVersion::V4_1 => 4,
        }
    }

    pub fn minor(&self) -> u32 {
        match self {
            MshVersion::V1_0 | MshVersion::V2_0 | MshVersion::V4_0 => 0,
            MshVersion::V2_1 | MshVersion::V4_1 => 1,
            MshVersion::V2_2 => 2,
        }
    }

    /// The version as a decimal number, e.g. `4.1`.
    pub fn number(&self) -> f64 {
        self.major() as f64 + self.minor() as f64 / 10.0
    }

    /// Returns the section-parser family for this version.
    pub fn family(&self) -> SectionFamily {
        match self {
            MshVersion::V1_0 => SectionFamily::V1,
            MshVersion::V2_0 | MshVersion::V2_1 | MshVersion::V2_2 => SectionFamily::V2,
            MshVersion::V4_0 | MshVersion::V4_1 => SectionFamily::V4,
        }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for MshVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl TryFrom<(u32, u32)> for MshVersion {
    type Error = MshError;
    fn try_from((major, minor): (u32, u32)) -> Result<Self> {
        Self::RECOGNIZED
            .iter()
            .copied()
            .find(|v| v.major() == major && v.minor() == minor)
            .ok_or(MshError::UnrecognizedVersion { major, minor })
    }
}

/// Splits a decimal version string into `(major, minor)`.
///
/// Only the first decimal digit is significant: `"2.2"` gives `(2, 2)` and
/// `"4.1"` gives `(4, 1)`.
pub fn parse_version(text: &str) -> Result<(u32, u32)> {
    let trimmed = text.trim();
    let malformed = || MshError::MalformedVersion(trimmed.to_string());

    let value: f64 = trimmed.parse().map_err(|_| malformed())?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(malformed());
    }

    let major = value.trunc();
    let minor = ((value - major) * 10.0).round();
    Ok((major as u32, minor as u32))
}

/// Looks up a `(major, minor)` pair in the registry.
pub fn resolve(major: u32, minor: u32) -> Result<MshVersion> {
    MshVersion::try_from((major, minor))
}

/// Parses, resolves and gates a version string in one step.
pub fn validate(text: &str) -> Result<MshVersion> {
    let (major, minor) = parse_version(text)?;
    let version = resolve(major, minor)?;
    if !version.is_supported() {
        return Err(MshError::UnsupportedVersion(version.to_string()));
    }
    Ok(version)
}

/// Lists the supported versions as display strings, e.g. `["1.0", "2.0", ...]`.
pub fn supported_versions() -> Vec<String> {
    MshVersion::SUPPORTED.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_and_minor() {
        assert_eq!(parse_version("4.1").unwrap(), (4, 1));
        assert_eq!(parse_version("2.2").unwrap(), (2, 2));
        assert_eq!(parse_version("1").unwrap(), (1, 0));
        assert_eq!(parse_version(" 2.0 ").unwrap(), (2, 0));
    }

    #[test]
    fn rejects_non_decimal_text() {
        assert!(matches!(parse_version("abc"), Err(MshError::MalformedVersion(_))));
        assert!(matches!(parse_version(""), Err(MshError::MalformedVersion(_))));
        assert!(matches!(parse_version("NaN"), Err(MshError::MalformedVersion(_))));
        assert!(matches!(parse_version("-2.2"), Err(MshError::MalformedVersion(_))));
    }

    #[test]
    fn resolves_known_versions() {
        for version in MshVersion::RECOGNIZED {
            assert_eq!(resolve(version.major(), version.minor()).unwrap(), *version);
        }
        assert!(matches!(
            resolve(3, 0),
            Err(MshError::UnrecognizedVersion { major: 3, minor: 0 })
        ));
    }

    #[test]
    fn validate_composes_parse_and_resolve() {
        assert_eq!(validate("4.1").unwrap(), MshVersion::V4_1);
        assert_eq!(validate("2.0").unwrap(), MshVersion::V2_0);
        assert!(matches!(
            validate("99.9"),
            Err(MshError::UnrecognizedVersion { major: 99, minor: 9 })
        ));
        assert!(matches!(validate("x.y"), Err(MshError::MalformedVersion(_))));
    }

    #[test]
    fn families_follow_major_version() {
        assert_eq!(MshVersion::V1_0.family(), SectionFamily::V1);
        assert_eq!(MshVersion::V2_1.family(), SectionFamily::V2);
        assert_eq!(MshVersion::V4_0.family(), SectionFamily::V4);
        for version in MshVersion::RECOGNIZED {
            let expected = match version.major() {
                1 => SectionFamily::V1,
                2 => SectionFamily::V2,
                4 => SectionFamily::V4,
                other => panic!("no family for major version {}", other),
            };
            assert_eq!(version.family(), expected, "{}", version);
        }
        assert_eq!(MshVersion::V2_2.to_string(), "2.2");
        assert!((MshVersion::V4_1.number() - 4.1).abs() < 1e-12);
        assert_eq!(supported_versions().len(), MshVersion::RECOGNIZED.len());
    }
}
