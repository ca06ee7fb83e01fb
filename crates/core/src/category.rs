use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four inventory partitions. Every ingredient lives in exactly one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Fluid,
    Solid,
    Essence,
    Potion,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown ingredient category `{0}`")]
    Unknown(String),
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Fluid,
        Category::Solid,
        Category::Essence,
        Category::Potion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fluid => "fluid",
            Self::Solid => "solid",
            Self::Essence => "essence",
            Self::Potion => "potion",
        }
    }

    /// Plural label used for inventory tabs.
    pub fn tab_label(self) -> &'static str {
        match self {
            Self::Fluid => "Liquids",
            Self::Solid => "Solids",
            Self::Essence => "Essences",
            Self::Potion => "Potions",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fluid" | "fluids" | "liquid" | "liquids" => Some(Self::Fluid),
            "solid" | "solids" => Some(Self::Solid),
            "essence" | "essences" => Some(Self::Essence),
            "potion" | "potions" => Some(Self::Potion),
            _ => None,
        }
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(value).ok_or_else(|| CategoryError::Unknown(value.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
