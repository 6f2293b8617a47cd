use std::fmt::{self, Display};

use crate::errors::ReadSupportError;

/// How much sequencing noise a read may carry and still count as support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrictnessMode {
    /// Mode 0: a small mismatch fraction is tolerated.
    Lenient,
    /// Mode 1: the discriminating bases must match exactly.
    #[default]
    Strict,
}

impl StrictnessMode {
    /// Wire value: 0 for lenient, 1 for strict.
    pub fn code(&self) -> u8 {
        match self {
            StrictnessMode::Lenient => 0,
            StrictnessMode::Strict => 1,
        }
    }
}

impl TryFrom<i64> for StrictnessMode {
    type Error = ReadSupportError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StrictnessMode::Lenient),
            1 => Ok(StrictnessMode::Strict),
            other => Err(ReadSupportError::InvalidStrictness(other)),
        }
    }
}

impl Display for StrictnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, StrictnessMode::Lenient)]
    #[case(1, StrictnessMode::Strict)]
    fn test_from_wire_value(#[case] value: i64, #[case] expected: StrictnessMode) {
        let mode = StrictnessMode::try_from(value).unwrap();
        assert_eq!(mode, expected);
        assert_eq!(mode.code() as i64, value);
    }

    #[rstest]
    #[case(2)]
    #[case(-1)]
    fn test_rejects_other_values(#[case] value: i64) {
        assert!(matches!(
            StrictnessMode::try_from(value),
            Err(ReadSupportError::InvalidStrictness(v)) if v == value
        ));
    }
}
