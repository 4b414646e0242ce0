use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The DICOM value representations (VRs) that header validation understands.
///
/// Each variant carries a declarative [`Grammar`]: a maximum length counted in
/// Unicode code points plus a structural rule. Validation is driven entirely by
/// that table, so supporting a new VR means adding a variant and a grammar
/// entry, not new control flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueRepresentation {
    /// VR `AS`: a fixed-form age, e.g. `"015Y"`.
    #[serde(rename = "AS")]
    AgeString,

    /// VR `CS`: a short code drawn from a restricted ASCII repertoire.
    #[serde(rename = "CS")]
    CodeString,

    /// VR `DA`: a `YYYYMMDD` calendar date, or empty for an absent date.
    #[serde(rename = "DA")]
    Date,

    /// VR `LO`: free text up to 64 code points, backslash excluded.
    #[serde(rename = "LO")]
    LongString,

    /// VR `PN`: a person name, same repertoire as `LO` with a larger limit.
    #[serde(rename = "PN")]
    PersonName,

    /// VR `UI`: a dot-separated numeric unique identifier.
    #[serde(rename = "UI")]
    UniqueIdentifier,
}

/// Structural rule applied after the length check, one per VR family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRule {
    /// Exactly three ASCII digits followed by one of `D`, `W`, `M`, `Y`.
    Age,

    /// Uppercase ASCII letters, digits, space and underscore only.
    CodeCharacters,

    /// Empty, or eight ASCII digits naming a real calendar date.
    CalendarDate,

    /// Any text without the backslash list separator.
    Text,

    /// Empty, or dot-separated numeric components without leading zeros.
    NumericComponents,
}

/// The constraint set for one VR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    /// Maximum value length in Unicode code points, not bytes.
    pub max_length: usize,
    pub rule: StructuralRule,
}

impl ValueRepresentation {
    /// Returns the authoritative [`Grammar`] for this VR.
    pub const fn grammar(self) -> Grammar {
        match self {
            ValueRepresentation::AgeString => Grammar {
                max_length: 4,
                rule: StructuralRule::Age,
            },
            ValueRepresentation::CodeString => Grammar {
                max_length: 16,
                rule: StructuralRule::CodeCharacters,
            },
            ValueRepresentation::Date => Grammar {
                max_length: 8,
                rule: StructuralRule::CalendarDate,
            },
            ValueRepresentation::LongString => Grammar {
                max_length: 64,
                rule: StructuralRule::Text,
            },
            ValueRepresentation::PersonName => Grammar {
                max_length: 324,
                rule: StructuralRule::Text,
            },
            ValueRepresentation::UniqueIdentifier => Grammar {
                max_length: 64,
                rule: StructuralRule::NumericComponents,
            },
        }
    }

    /// Maximum value length for this VR, in Unicode code points.
    pub const fn max_length(self) -> usize {
        self.grammar().max_length
    }

    /// The two-letter DICOM code for this VR.
    pub const fn code(self) -> &'static str {
        match self {
            ValueRepresentation::AgeString => "AS",
            ValueRepresentation::CodeString => "CS",
            ValueRepresentation::Date => "DA",
            ValueRepresentation::LongString => "LO",
            ValueRepresentation::PersonName => "PN",
            ValueRepresentation::UniqueIdentifier => "UI",
        }
    }
}

impl fmt::Display for ValueRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("{0} is not a supported value representation")]
pub struct ParseVrError(String);

impl FromStr for ValueRepresentation {
    type Err = ParseVrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AS" => Ok(ValueRepresentation::AgeString),
            "CS" => Ok(ValueRepresentation::CodeString),
            "DA" => Ok(ValueRepresentation::Date),
            "LO" => Ok(ValueRepresentation::LongString),
            "PN" => Ok(ValueRepresentation::PersonName),
            "UI" => Ok(ValueRepresentation::UniqueIdentifier),
            _ => Err(ParseVrError(s.into())),
        }
    }
}
