use crate::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Station {
    Retort,
    Mortar,
    Calcinator,
    Alembic,
    Infuser,
    MagicWand,
    Cauldron,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StationError {
    #[error("unknown station `{0}`")]
    Unknown(String),
}

type SuccessTemplate = fn(&[String], &[String]) -> String;
type FailureTemplate = fn(&[String]) -> String;

/// Static signature of a station: slot categories, recipe columns and
/// flavor text.
pub struct StationSpec {
    pub station: Station,
    pub name: &'static str,
    pub file_stem: &'static str,
    pub slots: &'static [Category],
    pub input_columns: &'static [&'static str],
    pub output_columns: &'static [&'static str],
    pub output: Category,
    success: SuccessTemplate,
    failure: FailureTemplate,
}

impl StationSpec {
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn success_message(&self, inputs: &[String], outputs: &[String]) -> String {
        (self.success)(inputs, outputs)
    }

    pub fn failure_message(&self, inputs: &[String]) -> String {
        (self.failure)(inputs)
    }
}

impl fmt::Debug for StationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationSpec")
            .field("name", &self.name)
            .field("slots", &self.slots)
            .field("output", &self.output)
            .finish()
    }
}

fn at(values: &[String], index: usize) -> &str {
    values.get(index).map(String::as_str).unwrap_or("?")
}

fn retort_success(inputs: &[String], outputs: &[String]) -> String {
    format!(
        "The retort produced {} from {}!",
        outputs.join(", "),
        at(inputs, 0)
    )
}

fn retort_failure(_: &[String]) -> String {
    "The retort failed to produce anything...".to_string()
}

fn mortar_success(inputs: &[String], outputs: &[String]) -> String {
    format!("You grinded the {} into {}!", at(inputs, 0), at(outputs, 0))
}

fn mortar_failure(inputs: &[String]) -> String {
    format!("You couldn't grind up the {}...", at(inputs, 0))
}

fn calcinator_success(inputs: &[String], outputs: &[String]) -> String {
    format!(
        "You refined {} and {} into {}!",
        at(inputs, 0),
        at(inputs, 1),
        at(outputs, 0)
    )
}

fn calcinator_failure(_: &[String]) -> String {
    "The calcinator created useless ash...".to_string()
}

fn alembic_success(inputs: &[String], outputs: &[String]) -> String {
    format!(
        "You transmuted {} into {} with {}!",
        at(inputs, 0),
        at(outputs, 0),
        at(inputs, 1)
    )
}

fn alembic_failure(_: &[String]) -> String {
    "The alembic fills with white smoke. The reaction must not have worked...".to_string()
}

fn infuser_success(inputs: &[String], outputs: &[String]) -> String {
    format!(
        "You infused {} into {} and created {}!",
        at(inputs, 0),
        at(inputs, 1),
        at(outputs, 0)
    )
}

fn infuser_failure(_: &[String]) -> String {
    "The reaction failed and resulted in useless sludge...".to_string()
}

fn magic_wand_success(inputs: &[String], outputs: &[String]) -> String {
    format!(
        "The magic wand combined {} and {} into {}!",
        at(inputs, 0),
        at(inputs, 1),
        at(outputs, 0)
    )
}

fn magic_wand_failure(_: &[String]) -> String {
    "The magic wand made the essences disappear...".to_string()
}

fn cauldron_success(_: &[String], outputs: &[String]) -> String {
    format!("You successfully brewed a {}!", at(outputs, 0))
}

fn cauldron_failure(_: &[String]) -> String {
    "This looks more like a soup than a potion...".to_string()
}

static RETORT: StationSpec = StationSpec {
    station: Station::Retort,
    name: "Retort",
    file_stem: "retort",
    slots: &[Category::Potion],
    input_columns: &["Input"],
    output_columns: &["Output1", "Output2", "Output3"],
    output: Category::Essence,
    success: retort_success,
    failure: retort_failure,
};

static MORTAR: StationSpec = StationSpec {
    station: Station::Mortar,
    name: "Mortar",
    file_stem: "mortar",
    slots: &[Category::Solid],
    input_columns: &["Solid"],
    output_columns: &["Output"],
    output: Category::Solid,
    success: mortar_success,
    failure: mortar_failure,
};

static CALCINATOR: StationSpec = StationSpec {
    station: Station::Calcinator,
    name: "Calcinator",
    file_stem: "calcinator",
    slots: &[Category::Solid, Category::Solid],
    input_columns: &["Solid1", "Solid2"],
    output_columns: &["Output"],
    output: Category::Solid,
    success: calcinator_success,
    failure: calcinator_failure,
};

static ALEMBIC: StationSpec = StationSpec {
    station: Station::Alembic,
    name: "Alembic",
    file_stem: "alembic",
    slots: &[Category::Fluid, Category::Essence],
    input_columns: &["Liquid1", "Essence1"],
    output_columns: &["Output"],
    output: Category::Fluid,
    success: alembic_success,
    failure: alembic_failure,
};

static INFUSER: StationSpec = StationSpec {
    station: Station::Infuser,
    name: "Infuser",
    file_stem: "infuser",
    slots: &[Category::Solid, Category::Fluid],
    input_columns: &["Solid1", "Liquid1"],
    output_columns: &["Output"],
    output: Category::Fluid,
    success: infuser_success,
    failure: infuser_failure,
};

static MAGIC_WAND: StationSpec = StationSpec {
    station: Station::MagicWand,
    name: "Magic Wand",
    file_stem: "magic_wand",
    slots: &[Category::Essence, Category::Essence],
    input_columns: &["Essence1", "Essence2"],
    output_columns: &["Output"],
    output: Category::Essence,
    success: magic_wand_success,
    failure: magic_wand_failure,
};

static CAULDRON: StationSpec = StationSpec {
    station: Station::Cauldron,
    name: "Cauldron",
    file_stem: "cauldron",
    slots: &[Category::Fluid, Category::Solid, Category::Essence],
    input_columns: &["Liquid", "Solid", "Essence"],
    output_columns: &["Output"],
    output: Category::Potion,
    success: cauldron_success,
    failure: cauldron_failure,
};

impl Station {
    pub const ALL: [Station; 7] = [
        Station::Retort,
        Station::Mortar,
        Station::Calcinator,
        Station::Alembic,
        Station::Infuser,
        Station::MagicWand,
        Station::Cauldron,
    ];

    pub fn spec(self) -> &'static StationSpec {
        match self {
            Self::Retort => &RETORT,
            Self::Mortar => &MORTAR,
            Self::Calcinator => &CALCINATOR,
            Self::Alembic => &ALEMBIC,
            Self::Infuser => &INFUSER,
            Self::MagicWand => &MAGIC_WAND,
            Self::Cauldron => &CAULDRON,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "retort" => Some(Self::Retort),
            "mortar" => Some(Self::Mortar),
            "calcinator" => Some(Self::Calcinator),
            "alembic" => Some(Self::Alembic),
            "infuser" => Some(Self::Infuser),
            "magicwand" | "wand" => Some(Self::MagicWand),
            "cauldron" => Some(Self::Cauldron),
            _ => None,
        }
    }
}

impl FromStr for Station {
    type Err = StationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(value).ok_or_else(|| StationError::Unknown(value.to_string()))
    }
}

impl TryFrom<String> for Station {
    type Error = StationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Station> for String {
    fn from(value: Station) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
