use serde::Deserialize;

pub use potion_mixer_core::{
    Category, GameConfig, IngredientDef, LevelDef, RecipeRecord, Station,
};

/// Level file as written by level authors. Everything but the ingredient
/// names is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLevel {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub target_potion: Option<String>,
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIngredient {
    Name(String),
    Entry {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        count: Option<i64>,
    },
}
