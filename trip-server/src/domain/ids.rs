//! Team and city identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<String, InvalidId> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(InvalidId {
            kind,
            reason: "must not contain control characters",
        });
    }

    Ok(trimmed.to_string())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                validate($kind, s).map(Self)
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// A team taking part in at least one game of a trip.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_server::domain::TeamId;
    ///
    /// let team = TeamId::parse(" BOS ").unwrap();
    /// assert_eq!(team.as_str(), "BOS");
    ///
    /// assert!(TeamId::parse("").is_err());
    /// assert!(TeamId::parse("   ").is_err());
    /// ```
    TeamId,
    "team"
);

identifier!(
    /// A city visited by a trip.
    CityId,
    "city"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(TeamId::parse("NYY").is_ok());
        assert!(TeamId::parse("Boston Red Sox").is_ok());
        assert!(CityId::parse("Chicago").is_ok());
        assert!(CityId::parse("St. Louis").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        let city = CityId::parse("  Denver\t").unwrap();
        assert_eq!(city.as_str(), "Denver");
    }

    #[test]
    fn reject_empty() {
        assert!(TeamId::parse("").is_err());
        assert!(CityId::parse(" \t ").is_err());
    }

    #[test]
    fn reject_control_characters() {
        assert!(TeamId::parse("NY\u{0}Y").is_err());
        assert!(CityId::parse("New\nYork").is_err());
    }

    #[test]
    fn error_display() {
        let err = TeamId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid team identifier: must not be empty");

        let err = CityId::parse("a\u{7}b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid city identifier: must not contain control characters"
        );
    }

    #[test]
    fn display_and_debug() {
        let team = TeamId::parse("SEA").unwrap();
        assert_eq!(format!("{}", team), "SEA");
        assert_eq!(format!("{:?}", team), "TeamId(SEA)");
    }

    #[test]
    fn serde_validates() {
        let team: TeamId = serde_json::from_str("\"LAD\"").unwrap();
        assert_eq!(team.as_str(), "LAD");
        assert_eq!(serde_json::to_string(&team).unwrap(), "\"LAD\"");

        assert!(serde_json::from_str::<CityId>("\"  \"").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut cities = vec![
            CityId::parse("Miami").unwrap(),
            CityId::parse("Atlanta").unwrap(),
            CityId::parse("Detroit").unwrap(),
        ];
        cities.sort();
        let names: Vec<&str> = cities.iter().map(CityId::as_str).collect();
        assert_eq!(names, ["Atlanta", "Detroit", "Miami"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any printable, non-blank name parses to its trimmed form
        #[test]
        fn printable_names_parse(s in "[A-Za-z0-9 .'-]{0,3}[A-Za-z][A-Za-z0-9 .'-]{0,20}") {
            let team = TeamId::parse(&s).unwrap();
            prop_assert_eq!(team.as_str(), s.trim());
        }

        /// Whitespace-only strings are always rejected
        #[test]
        fn blank_rejected(s in "[ \t]{0,8}") {
            prop_assert!(CityId::parse(&s).is_err());
        }
    }
}
