use crate::Station;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default = "default_recipes_dir")]
    pub recipes_dir: String,
    #[serde(default = "default_levels_dir")]
    pub levels_dir: String,
    #[serde(default = "default_first_level")]
    pub first_level: u32,
}

fn default_recipes_dir() -> String {
    "recipes".to_string()
}

fn default_levels_dir() -> String {
    "levels".to_string()
}

fn default_first_level() -> u32 {
    1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            recipes_dir: default_recipes_dir(),
            levels_dir: default_levels_dir(),
            first_level: default_first_level(),
        }
    }
}

impl GameConfig {
    pub fn recipe_file_name(station: Station) -> String {
        format!("{}.json", station.spec().file_stem)
    }

    pub fn level_file_name(level: u32) -> String {
        format!("level{level}.json")
    }
}
