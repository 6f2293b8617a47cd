use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};

///
/// Support category for one read at one locus.
///
/// The derived ordering is the display grouping: reference first, alternates by index,
/// then reads that matched nothing, then reads that could not be decided.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Reference,
    Alternate(usize),
    /// Content conflicts with every declared allele.
    NoMatch,
    /// Window not covered well enough to decide.
    Ambiguous,
}

impl Category {
    pub fn is_allele(&self) -> bool {
        matches!(self, Category::Reference | Category::Alternate(_))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Reference => write!(f, "ref"),
            Category::Alternate(i) => write!(f, "alt_{}", i),
            Category::NoMatch => write!(f, "none"),
            Category::Ambiguous => write!(f, "amb"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ref" => Ok(Category::Reference),
            "none" => Ok(Category::NoMatch),
            "amb" => Ok(Category::Ambiguous),
            _ => s
                .strip_prefix("alt_")
                .and_then(|i| i.parse::<usize>().ok())
                .map(Category::Alternate)
                .ok_or_else(|| format!("Unknown category: {}", s)),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
