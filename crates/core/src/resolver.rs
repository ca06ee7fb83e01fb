use crate::{Category, ItemCount, Ledger, RecipeBook, RecipeError, Station, StationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MixError {
    #[error(transparent)]
    Station(#[from] StationError),
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixOutcome {
    /// Precondition failed; nothing was consumed.
    Missing {
        item: String,
        category: Category,
        needed: ItemCount,
        available: ItemCount,
    },
    /// Inputs were consumed but no recipe row matched.
    NoRecipe,
    Brewed { outputs: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixReport {
    pub station: Station,
    pub inputs: Vec<String>,
    pub outcome: MixOutcome,
    pub message: String,
}

impl MixReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MixOutcome::Brewed { .. })
    }

    pub fn consumed_inputs(&self) -> bool {
        !matches!(self.outcome, MixOutcome::Missing { .. })
    }
}

/// Runs station mixes against an injected, read-only recipe book.
#[derive(Debug, Clone, Copy)]
pub struct StationResolver<'r> {
    book: &'r RecipeBook,
}

impl<'r> StationResolver<'r> {
    pub fn new(book: &'r RecipeBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &'r RecipeBook {
        self.book
    }

    pub fn mix_by_name<L: Ledger + ?Sized>(
        &self,
        station: &str,
        ledger: &mut L,
        inputs: &[&str],
    ) -> Result<MixReport, MixError> {
        let station: Station = station.parse()?;
        self.mix(station, ledger, inputs).map_err(MixError::from)
    }

    /// Validates, consumes one unit per slot, looks up the recipe and adds
    /// its outputs. A failed lookup keeps the inputs consumed.
    pub fn mix<L: Ledger + ?Sized>(
        &self,
        station: Station,
        ledger: &mut L,
        inputs: &[&str],
    ) -> Result<MixReport, RecipeError> {
        let spec = station.spec();
        if inputs.len() != spec.arity() {
            return Err(RecipeError::ArityMismatch {
                station,
                expected: spec.arity(),
                found: inputs.len(),
            });
        }
        let table = self.book.table(station)?;
        let named: Vec<String> = inputs.iter().map(|input| input.to_string()).collect();

        // Repeated inputs (e.g. the same solid twice) need that many units.
        let mut required: BTreeMap<(&str, Category), ItemCount> = BTreeMap::new();
        for (input, category) in inputs.iter().zip(spec.slots) {
            *required.entry((*input, *category)).or_default() += 1;
        }
        for (input, category) in inputs.iter().zip(spec.slots) {
            let needed = required[&(*input, *category)];
            if !ledger.check(input, *category, needed) {
                let available = ledger.count(input, *category);
                log::debug!("{station}: missing {category} `{input}` ({available}/{needed})");
                return Ok(MixReport {
                    station,
                    message: format!(
                        "You need {needed} {category} `{input}` for the {station} but have {available}."
                    ),
                    inputs: named,
                    outcome: MixOutcome::Missing {
                        item: input.to_string(),
                        category: *category,
                        needed,
                        available,
                    },
                });
            }
        }

        for (input, category) in inputs.iter().zip(spec.slots) {
            if !ledger.remove(input, *category, 1) {
                log::warn!("{station}: ledger refused to release checked {category} `{input}`");
            }
        }

        let outputs: Vec<String> = table
            .lookup(inputs)
            .map(|row| row.produced().map(str::to_string).collect())
            .unwrap_or_default();
        if outputs.is_empty() {
            log::debug!("{station}: no recipe for ({})", inputs.join(", "));
            return Ok(MixReport {
                station,
                message: spec.failure_message(&named),
                inputs: named,
                outcome: MixOutcome::NoRecipe,
            });
        }

        for output in &outputs {
            ledger.add(output, spec.output, 1);
        }
        ledger.cleanup();
        log::debug!(
            "{station}: ({}) -> ({})",
            inputs.join(", "),
            outputs.join(", ")
        );
        Ok(MixReport {
            station,
            message: spec.success_message(&named, &outputs),
            inputs: named,
            outcome: MixOutcome::Brewed { outputs },
        })
    }

    pub fn retort<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        potion: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Retort, ledger, &[potion])
    }

    pub fn mortar<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        solid: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Mortar, ledger, &[solid])
    }

    pub fn calcinator<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        solid1: &str,
        solid2: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Calcinator, ledger, &[solid1, solid2])
    }

    pub fn alembic<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        liquid: &str,
        essence: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Alembic, ledger, &[liquid, essence])
    }

    pub fn infuser<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        solid: &str,
        liquid: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Infuser, ledger, &[solid, liquid])
    }

    pub fn magic_wand<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        essence1: &str,
        essence2: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::MagicWand, ledger, &[essence1, essence2])
    }

    pub fn cauldron<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        liquid: &str,
        solid: &str,
        essence: &str,
    ) -> Result<MixReport, RecipeError> {
        self.mix(Station::Cauldron, ledger, &[liquid, solid, essence])
    }
}
