//! Four-part format versions and their comparison.
//!
//! nif.xml writes versions either dotted (`20.2.0.7`) or underscored with a
//! leading `V` (`V20_2_0_7`). Both forms parse to the same [`Version`].

use crate::error::ParseError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A `major.minor.micro.patch` version tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Micro component.
    pub micro: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Creates a version from its four components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, micro: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            patch,
        }
    }

    /// Parses a dotted or underscored version string.
    ///
    /// Missing trailing components default to zero, and any leading `V`
    /// on the first component is ignored.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidVersion`] if a component is not a
    /// non-negative integer.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let separator = if text.contains('.') { '.' } else { '_' };

        let mut components = [0u32; 4];
        for (idx, part) in text.split(separator).enumerate() {
            let part = if idx == 0 {
                part.trim_start_matches('V')
            } else {
                part
            };
            let value = part
                .parse::<u32>()
                .map_err(|_| ParseError::invalid_version(text))?;
            if let Some(slot) = components.get_mut(idx) {
                *slot = value;
            }
        }

        let [major, minor, micro, patch] = components;
        Ok(Self::new(major, minor, micro, patch))
    }

    /// Returns how `self` relates to `other`.
    #[must_use]
    pub fn relation_to(&self, other: &Self) -> VersionRelation {
        match self.cmp(other) {
            Ordering::Less => VersionRelation::Lower,
            Ordering::Equal => VersionRelation::Exact,
            Ordering::Greater => VersionRelation::Higher,
        }
    }

    /// Components joined by `", "`, as used in generated `FileVersion(..)`
    /// literals.
    #[must_use]
    pub fn to_tuple_literal(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.major, self.minor, self.micro, self.patch
        )
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.micro, self.patch
        )
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Outcome of comparing two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionRelation {
    /// The left-hand version is older.
    Lower,
    /// Both versions are identical.
    Exact,
    /// The left-hand version is newer.
    Higher,
}

/// Compares a target version against a version string from the schema.
///
/// The result describes `target` relative to `text`: `Lower` means the
/// target predates the written version.
///
/// # Errors
/// Returns [`ParseError::InvalidVersion`] if `text` does not parse.
pub fn compare(target: Version, text: &str) -> Result<VersionRelation, ParseError> {
    Ok(target.relation_to(&Version::parse(text)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        assert_eq!(Version::parse("20.2.0.7").unwrap(), Version::new(20, 2, 0, 7));
    }

    #[test]
    fn test_parse_underscored_with_prefix() {
        assert_eq!(
            Version::parse("V20_2_0_7").unwrap(),
            Version::new(20, 2, 0, 7)
        );
    }

    #[test]
    fn test_parse_missing_components_default_to_zero() {
        assert_eq!(Version::parse("10.1").unwrap(), Version::new(10, 1, 0, 0));
        assert_eq!(Version::parse("4").unwrap(), Version::new(4, 0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Version::parse("20.x.0.0"),
            Err(ParseError::InvalidVersion { .. })
        ));
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_compare_lower() {
        let rel = compare(Version::new(20, 1, 0, 3), "20.1.0.4").unwrap();
        assert_eq!(rel, VersionRelation::Lower);
    }

    #[test]
    fn test_compare_exact_across_separators() {
        let rel = compare(Version::new(20, 2, 0, 7), "20_2_0_7").unwrap();
        assert_eq!(rel, VersionRelation::Exact);
    }

    #[test]
    fn test_compare_short_circuits_on_first_difference() {
        // The minor component decides even though patch would say otherwise.
        let rel = compare(Version::new(20, 3, 0, 0), "20.2.0.255").unwrap();
        assert_eq!(rel, VersionRelation::Higher);
    }

    #[test]
    fn test_display_and_tuple_literal() {
        let v = Version::new(20, 6, 0, 0);
        assert_eq!(v.to_string(), "20.6.0.0");
        assert_eq!(v.to_tuple_literal(), "20, 6, 0, 0");
    }

    #[test]
    fn test_deserialize_from_string() {
        let v: Version = serde_json::from_str("\"20.3.0.9\"").unwrap();
        assert_eq!(v, Version::new(20, 3, 0, 9));
    }
}
