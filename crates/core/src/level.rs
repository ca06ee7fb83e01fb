use crate::{Category, Inventory, ItemCount, Ledger, Station};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type CategoryMap = BTreeMap<String, Category>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientDef {
    pub name: String,
    pub category: Category,
    pub count: ItemCount,
}

/// A level as handed over by the level loader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelDef {
    pub level: u32,
    pub objective: String,
    #[serde(default)]
    pub target_potion: Option<String>,
    pub stations: Vec<Station>,
    pub ingredients: Vec<IngredientDef>,
}

impl LevelDef {
    /// Initial inventory plus the name to category map shown in the tabs.
    /// A name listed twice keeps the category of its last entry in the map.
    pub fn seed(&self) -> (Inventory, CategoryMap) {
        let mut inventory = Inventory::new();
        let mut categories = CategoryMap::new();
        for ingredient in &self.ingredients {
            inventory.add(&ingredient.name, ingredient.category, ingredient.count);
            categories.insert(ingredient.name.clone(), ingredient.category);
        }
        (inventory, categories)
    }

    pub fn has_station(&self, station: Station) -> bool {
        self.stations.contains(&station)
    }
}
