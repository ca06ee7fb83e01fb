use crate::{
    Category, CategoryMap, Event, EventBus, Inventory, Ledger, LevelDef, MixReport, RecipeError,
    Reservation, ReservedView, Station, StationResolver,
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} is not available in this level")]
    StationNotInLevel(Station),
    #[error("{station} has no slot {}", .slot + 1)]
    SlotOutOfRange { station: Station, slot: usize },
    #[error("{station} slot {} already holds `{item}`", .slot + 1)]
    SlotOccupied {
        station: Station,
        slot: usize,
        item: String,
    },
    #[error("{station} slot {} is empty", .slot + 1)]
    SlotEmpty { station: Station, slot: usize },
    #[error("fill all {0} slots before mixing")]
    SlotsNotFilled(Station),
    #[error("cannot place {found} `{item}` in this slot (needs {expected})")]
    WrongCategory {
        item: String,
        expected: Category,
        found: Category,
    },
    #[error("no {category} `{item}` left to place")]
    NotAvailable { item: String, category: Category },
    #[error("{station} slot {} holds `{item}` but no unit is reserved for it", .slot + 1)]
    NotReserved {
        station: Station,
        slot: usize,
        item: String,
    },
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

/// One attempt at a level: inventory, station slots and their reservations.
#[derive(Debug)]
pub struct MixingSession<'r> {
    level: LevelDef,
    resolver: StationResolver<'r>,
    inventory: Inventory,
    categories: CategoryMap,
    slots: BTreeMap<Station, Vec<Option<String>>>,
    reservations: BTreeMap<Station, Reservation>,
    retries: u32,
    completed: bool,
    pub events: EventBus,
}

impl<'r> MixingSession<'r> {
    pub fn new(level: LevelDef, resolver: StationResolver<'r>) -> Self {
        let (inventory, categories) = level.seed();
        let mut session = Self {
            level,
            resolver,
            inventory,
            categories,
            slots: BTreeMap::new(),
            reservations: BTreeMap::new(),
            retries: 0,
            completed: false,
            events: EventBus::default(),
        };
        session.reset_stations();
        log::info!(
            "loaded level {}: {}",
            session.level.level,
            session.level.objective
        );
        session
    }

    fn reset_stations(&mut self) {
        self.slots.clear();
        self.reservations.clear();
        for station in &self.level.stations {
            self.slots.insert(*station, vec![None; station.spec().arity()]);
            self.reservations.insert(*station, Reservation::new());
        }
    }

    pub fn level(&self) -> &LevelDef {
        &self.level
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn stations(&self) -> &[Station] {
        &self.level.stations
    }

    pub fn slots(&self, station: Station) -> Option<&[Option<String>]> {
        self.slots.get(&station).map(Vec::as_slice)
    }

    pub fn reservation(&self, station: Station) -> Option<&Reservation> {
        self.reservations.get(&station)
    }

    /// Known category for `name`: the level's map first, then any bucket
    /// that currently holds it.
    pub fn category_of(&self, name: &str) -> Option<Category> {
        self.categories
            .get(name)
            .copied()
            .or_else(|| self.inventory.categories_of(name).first().copied())
    }

    /// Items on the inventory tab for `category`, excluding units sitting in
    /// station slots.
    pub fn tab(&self, category: Category) -> Vec<(String, u32)> {
        self.inventory.items_of(category)
    }

    fn slot_mut(
        &mut self,
        station: Station,
        slot: usize,
    ) -> Result<&mut Option<String>, SessionError> {
        let slots = self
            .slots
            .get_mut(&station)
            .ok_or(SessionError::StationNotInLevel(station))?;
        slots
            .get_mut(slot)
            .ok_or(SessionError::SlotOutOfRange { station, slot })
    }

    /// Puts one unit of `item` into a station slot, reserving it.
    pub fn place(&mut self, station: Station, slot: usize, item: &str) -> Result<(), SessionError> {
        if let Some(current) = self.slot_mut(station, slot)?.as_ref() {
            return Err(SessionError::SlotOccupied {
                station,
                slot,
                item: current.clone(),
            });
        }
        let expected = station.spec().slots[slot];
        if self.inventory.count(item, expected) == 0 {
            return Err(match self.inventory.categories_of(item).first() {
                Some(found) => SessionError::WrongCategory {
                    item: item.to_string(),
                    expected,
                    found: *found,
                },
                None => SessionError::NotAvailable {
                    item: item.to_string(),
                    category: expected,
                },
            });
        }
        let reservation = self.reservations.entry(station).or_default();
        if !reservation.hold(&mut self.inventory, item, expected, 1) {
            return Err(SessionError::NotAvailable {
                item: item.to_string(),
                category: expected,
            });
        }
        *self.slot_mut(station, slot)? = Some(item.to_string());
        self.events.push(Event::ItemPlaced {
            station,
            slot,
            item: item.to_string(),
            category: expected,
        });
        Ok(())
    }

    /// Empties a slot and returns its unit to the inventory.
    pub fn take(&mut self, station: Station, slot: usize) -> Result<String, SessionError> {
        let item = self
            .slot_mut(station, slot)?
            .clone()
            .ok_or(SessionError::SlotEmpty { station, slot })?;
        let category = station.spec().slots[slot];
        let released = self
            .reservations
            .get_mut(&station)
            .is_some_and(|reservation| {
                reservation.release(&mut self.inventory, &item, category, 1)
            });
        if !released {
            log::warn!("{station} slot {} holds `{item}` without a reserved unit", slot + 1);
            return Err(SessionError::NotReserved {
                station,
                slot,
                item,
            });
        }
        *self.slot_mut(station, slot)? = None;
        self.events.push(Event::ItemTaken {
            station,
            slot,
            item: item.clone(),
        });
        Ok(item)
    }

    /// Mixes whatever sits in the station's slots.
    pub fn mix(&mut self, station: Station) -> Result<MixReport, SessionError> {
        let slots = self
            .slots
            .get(&station)
            .ok_or(SessionError::StationNotInLevel(station))?;
        let inputs: Vec<String> = slots
            .iter()
            .map(|slot| slot.clone().ok_or(SessionError::SlotsNotFilled(station)))
            .collect::<Result<_, _>>()?;
        let refs: Vec<&str> = inputs.iter().map(String::as_str).collect();

        let reservation = self.reservations.entry(station).or_default();
        let report = {
            let mut view = ReservedView::new(&mut self.inventory, reservation);
            self.resolver.mix(station, &mut view, &refs)?
        };
        reservation.release_all(&mut self.inventory);
        if let Some(slots) = self.slots.get_mut(&station) {
            slots.iter_mut().for_each(|slot| *slot = None);
        }

        self.events.push(Event::Mixed {
            station,
            outcome: report.outcome.clone(),
        });
        if !self.completed && self.objective_met() {
            self.completed = true;
            self.events.push(Event::LevelCompleted {
                level: self.level.level,
                retries: self.retries,
            });
        }
        Ok(report)
    }

    pub fn objective_met(&self) -> bool {
        self.level
            .target_potion
            .as_deref()
            .is_some_and(|target| self.inventory.check(target, Category::Potion, 1))
    }

    /// Restores the level's starting inventory and counts a retry.
    pub fn retry(&mut self) {
        let (inventory, categories) = self.level.seed();
        self.inventory = inventory;
        self.categories = categories;
        self.reset_stations();
        self.completed = false;
        self.retries += 1;
        self.events.push(Event::LevelRetried {
            level: self.level.level,
            retries: self.retries,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IngredientDef, RecipeBook};

    fn level() -> LevelDef {
        LevelDef {
            level: 1,
            objective: "Grind a root".to_string(),
            target_potion: None,
            stations: vec![Station::Mortar],
            ingredients: vec![IngredientDef {
                name: "Root".to_string(),
                category: Category::Solid,
                count: 1,
            }],
        }
    }

    #[test]
    fn take_keeps_slot_when_nothing_is_reserved() {
        let book = RecipeBook::new();
        let mut session = MixingSession::new(level(), StationResolver::new(&book));
        session.place(Station::Mortar, 0, "Root").expect("place");
        session.reservations.insert(Station::Mortar, Reservation::new());

        assert_eq!(
            session.take(Station::Mortar, 0),
            Err(SessionError::NotReserved {
                station: Station::Mortar,
                slot: 0,
                item: "Root".to_string(),
            })
        );
        assert_eq!(
            session.slots(Station::Mortar),
            Some(&[Some("Root".to_string())][..])
        );
        assert_eq!(session.inventory().count("Root", Category::Solid), 0);
    }
}
