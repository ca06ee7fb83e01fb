use crate::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ItemName = String;
pub type ItemCount = u32;
pub type Bucket = BTreeMap<ItemName, ItemCount>;

/// Count-keeping capability shared by the plain inventory and the
/// reservation-aware view. Station logic only talks to this trait.
pub trait Ledger {
    fn count(&self, name: &str, category: Category) -> ItemCount;

    fn check(&self, name: &str, category: Category, count: ItemCount) -> bool {
        self.count(name, category) >= count
    }

    fn add(&mut self, name: &str, category: Category, count: ItemCount);

    /// Returns false when fewer than `count` units are available.
    fn remove(&mut self, name: &str, category: Category, count: ItemCount) -> bool;

    /// Entries with a positive count, in name order.
    fn items_of(&self, category: Category) -> Vec<(ItemName, ItemCount)>;

    fn cleanup(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub fluids: Bucket,
    #[serde(default)]
    pub solids: Bucket,
    #[serde(default)]
    pub essences: Bucket,
    #[serde(default)]
    pub potions: Bucket,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, category: Category) -> &Bucket {
        match category {
            Category::Fluid => &self.fluids,
            Category::Solid => &self.solids,
            Category::Essence => &self.essences,
            Category::Potion => &self.potions,
        }
    }

    pub fn bucket_mut(&mut self, category: Category) -> &mut Bucket {
        match category {
            Category::Fluid => &mut self.fluids,
            Category::Solid => &mut self.solids,
            Category::Essence => &mut self.essences,
            Category::Potion => &mut self.potions,
        }
    }

    /// Every category whose bucket currently holds at least one `name`.
    pub fn categories_of(&self, name: &str) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.count(name, *category) > 0)
            .collect()
    }

    pub fn total(&self) -> ItemCount {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.bucket(category).values())
            .copied()
            .fold(0, ItemCount::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Ledger for Inventory {
    fn count(&self, name: &str, category: Category) -> ItemCount {
        self.bucket(category).get(name).copied().unwrap_or(0)
    }

    fn add(&mut self, name: &str, category: Category, count: ItemCount) {
        let entry = self.bucket_mut(category).entry(name.to_string()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    fn remove(&mut self, name: &str, category: Category, count: ItemCount) -> bool {
        if count == 0 {
            return true;
        }
        match self.bucket_mut(category).get_mut(name) {
            Some(stored) if *stored >= count => {
                *stored -= count;
                true
            }
            _ => false,
        }
    }

    fn items_of(&self, category: Category) -> Vec<(ItemName, ItemCount)> {
        self.bucket(category)
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, count)| (name.clone(), *count))
            .collect()
    }

    fn cleanup(&mut self) {
        for category in Category::ALL {
            self.bucket_mut(category).retain(|_, count| *count > 0);
        }
    }
}
