use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

use crate::error::Error;

/// Ordered stages of compiling a unit.
///
/// A unit compiled "to" a phase has run every phase up to and including it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum CompilePhase {
    Initialization = 1,
    Parsing = 2,
    Conversion = 3,
    SemanticAnalysis = 4,
    Canonicalization = 5,
    InstructionSelection = 6,
    ClassGeneration = 7,
    Output = 8,
    Finalization = 9,
}

impl CompilePhase {
    pub const FIRST: Self = Self::Initialization;
    pub const LAST: Self = Self::Finalization;

    pub const fn number(self) -> u8 {
        self as u8
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_repr(self.number() + 1)
    }

    /// Parse either a phase name (`semantic_analysis`, `SemanticAnalysis`)
    /// or its number (`4`).
    pub fn parse(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if let Ok(number) = text.parse::<u8>() {
            return Self::try_from(number);
        }

        text.replace(['_', '-', ' '], "")
            .parse()
            .map_err(|_| Error::UnknownPhase(text.to_owned()))
    }
}

impl TryFrom<u8> for CompilePhase {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_repr(number).ok_or_else(|| Error::UnknownPhase(number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_numbering_follows_order() {
        let numbers: Vec<_> = CompilePhase::iter().map(CompilePhase::number).collect();

        assert_eq!(numbers, (1..=9).collect::<Vec<u8>>());
        assert_eq!(CompilePhase::COUNT, 9);
        assert!(CompilePhase::Conversion < CompilePhase::ClassGeneration);
    }

    #[test]
    fn test_try_from_number() {
        assert_eq!(CompilePhase::try_from(4).ok(), Some(CompilePhase::SemanticAnalysis));
        assert!(matches!(CompilePhase::try_from(0), Err(Error::UnknownPhase(_))));
        assert!(matches!(CompilePhase::try_from(10), Err(Error::UnknownPhase(_))));
    }

    #[test]
    fn test_parse_name_or_number() {
        assert_eq!(
            CompilePhase::parse("class_generation").ok(),
            Some(CompilePhase::ClassGeneration)
        );
        assert_eq!(CompilePhase::parse("Output").ok(), Some(CompilePhase::Output));
        assert_eq!(CompilePhase::parse("3").ok(), Some(CompilePhase::Conversion));
        assert!(matches!(
            CompilePhase::parse("linking"),
            Err(Error::UnknownPhase(name)) if name == "linking"
        ));
    }

    #[test]
    fn test_next() {
        assert_eq!(CompilePhase::Parsing.next(), Some(CompilePhase::Conversion));
        assert_eq!(CompilePhase::LAST.next(), None);
    }
}
