use crate::{Category, Inventory, ItemCount, ItemName, Ledger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Units already withdrawn from a base inventory and held aside, e.g. while
/// they sit in a station slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    held: Inventory,
}

impl Reservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self, name: &str, category: Category) -> ItemCount {
        self.held.count(name, category)
    }

    pub fn as_inventory(&self) -> &Inventory {
        &self.held
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Moves `count` units from `base` into the reservation.
    pub fn hold(
        &mut self,
        base: &mut Inventory,
        name: &str,
        category: Category,
        count: ItemCount,
    ) -> bool {
        if !base.remove(name, category, count) {
            return false;
        }
        self.held.add(name, category, count);
        log::debug!("reserved {count} {category} `{name}`");
        true
    }

    /// Returns `count` held units to `base`.
    pub fn release(
        &mut self,
        base: &mut Inventory,
        name: &str,
        category: Category,
        count: ItemCount,
    ) -> bool {
        if !self.held.remove(name, category, count) {
            return false;
        }
        base.add(name, category, count);
        self.held.cleanup();
        log::debug!("released {count} {category} `{name}`");
        true
    }

    pub fn release_all(&mut self, base: &mut Inventory) {
        for category in Category::ALL {
            for (name, count) in self.held.items_of(category) {
                base.add(&name, category, count);
            }
        }
        self.held = Inventory::new();
    }
}

/// A ledger over `base` that drains `reserved` units first.
#[derive(Debug)]
pub struct ReservedView<'a> {
    base: &'a mut Inventory,
    reserved: &'a mut Reservation,
}

impl<'a> ReservedView<'a> {
    pub fn new(base: &'a mut Inventory, reserved: &'a mut Reservation) -> Self {
        Self { base, reserved }
    }

    pub fn base(&self) -> &Inventory {
        self.base
    }

    pub fn reservation(&self) -> &Reservation {
        self.reserved
    }
}

impl Ledger for ReservedView<'_> {
    fn count(&self, name: &str, category: Category) -> ItemCount {
        self.base
            .count(name, category)
            .saturating_add(self.reserved.held(name, category))
    }

    fn add(&mut self, name: &str, category: Category, count: ItemCount) {
        self.base.add(name, category, count);
    }

    /// Drains the reservation before the base ledger. A shortfall in the base
    /// does not restore what was already drained from the reservation.
    fn remove(&mut self, name: &str, category: Category, count: ItemCount) -> bool {
        let drained = self.reserved.held(name, category).min(count);
        if drained > 0 {
            self.reserved.held.remove(name, category, drained);
        }
        let remaining = count - drained;
        if remaining == 0 {
            return true;
        }
        self.base.remove(name, category, remaining)
    }

    fn items_of(&self, category: Category) -> Vec<(ItemName, ItemCount)> {
        let mut merged: BTreeMap<ItemName, ItemCount> = BTreeMap::new();
        for (name, count) in self
            .base
            .items_of(category)
            .into_iter()
            .chain(self.reserved.held.items_of(category))
        {
            let entry = merged.entry(name).or_default();
            *entry = entry.saturating_add(count);
        }
        merged.into_iter().collect()
    }

    fn cleanup(&mut self) {
        self.base.cleanup();
        self.reserved.held.cleanup();
    }
}
