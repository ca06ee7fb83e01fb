use crate::schema::{
    Category, GameConfig, IngredientDef, LevelDef, RawIngredient, RawLevel, Station,
};
use anyhow::{bail, Context};
use potion_mixer_core::{RecipeBook, RecipeRecord, RecipeTable};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const DEFAULT_OBJECTIVE: &str = "Unknown objective";
const DEFAULT_CATEGORY: Category = Category::Solid;

/// An assets directory together with its config.
#[derive(Debug, Clone)]
pub struct Assets {
    pub root: PathBuf,
    pub config: GameConfig,
}

impl Assets {
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            bail!("assets directory {} not found", root.display());
        }
        let config = load_game_config(&root)?;
        Ok(Self { root, config })
    }

    pub fn recipes_dir(&self) -> PathBuf {
        self.root.join(&self.config.recipes_dir)
    }

    pub fn levels_dir(&self) -> PathBuf {
        self.root.join(&self.config.levels_dir)
    }

    pub fn recipes(&self) -> anyhow::Result<RecipeBook> {
        load_recipe_book(&self.recipes_dir())
    }

    pub fn level(&self, level: u32) -> anyhow::Result<LevelDef> {
        load_level(&self.levels_dir(), level)
    }

    pub fn has_level(&self, level: u32) -> bool {
        self.levels_dir()
            .join(GameConfig::level_file_name(level))
            .is_file()
    }

    /// Level ids with a file on disk, counting up from the first level until
    /// one is missing.
    pub fn level_ids(&self) -> Vec<u32> {
        (self.config.first_level..)
            .take_while(|level| self.has_level(*level))
            .collect()
    }
}

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        load_json(path)
    } else {
        Ok(GameConfig::default())
    }
}

pub fn load_recipe_table(path: &Path, station: Station) -> anyhow::Result<RecipeTable> {
    let records: Vec<RecipeRecord> = load_json(path)?;
    let table = RecipeTable::from_records(station, &records)
        .with_context(|| format!("validate {}", path.display()))?;
    log::info!(
        "loaded {} {} recipes from {}",
        table.len(),
        station,
        path.display()
    );
    Ok(table)
}

/// Loads one table per station. A missing table file is a load failure.
pub fn load_recipe_book(dir: &Path) -> anyhow::Result<RecipeBook> {
    let mut book = RecipeBook::new();
    for station in Station::ALL {
        let path = dir.join(GameConfig::recipe_file_name(station));
        book.insert(load_recipe_table(&path, station)?);
    }
    Ok(book)
}

pub fn load_level(dir: &Path, level: u32) -> anyhow::Result<LevelDef> {
    let path = dir.join(GameConfig::level_file_name(level));
    let raw: RawLevel = load_json(&path)?;
    let def = parse_level(raw, level).with_context(|| format!("validate {}", path.display()))?;
    log::info!("loaded level {} from {}", def.level, path.display());
    Ok(def)
}

/// Applies the level file defaults: bare names and missing categories are
/// solids, counts default to 1 and clamp at 0, blank names are skipped.
pub fn parse_level(raw: RawLevel, fallback_level: u32) -> anyhow::Result<LevelDef> {
    let stations = raw
        .stations
        .iter()
        .map(|name| name.parse::<Station>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut ingredients = Vec::with_capacity(raw.ingredients.len());
    for (index, entry) in raw.ingredients.into_iter().enumerate() {
        let (name, category, count) = match entry {
            RawIngredient::Name(name) => (name, None, None),
            RawIngredient::Entry {
                name,
                category,
                count,
            } => (name.unwrap_or_default(), category, count),
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            log::warn!("skipping unnamed ingredient #{index}");
            continue;
        }
        let category = match category {
            Some(value) => value
                .parse::<Category>()
                .with_context(|| format!("ingredient `{name}`"))?,
            None => DEFAULT_CATEGORY,
        };
        let count = count.unwrap_or(1).clamp(0, i64::from(u32::MAX)) as u32;
        ingredients.push(IngredientDef {
            name,
            category,
            count,
        });
    }

    Ok(LevelDef {
        level: raw.level.unwrap_or(fallback_level),
        objective: raw
            .objective
            .unwrap_or_else(|| DEFAULT_OBJECTIVE.to_string()),
        target_potion: raw
            .target_potion
            .map(|target| target.trim().to_string())
            .filter(|target| !target.is_empty()),
        stations,
        ingredients,
    })
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
