use crate::Station;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Literal used in recipe data for an unused output column.
pub const UNUSED_OUTPUT: &str = "None";

/// One raw tabular row: column name to cell value.
pub type RecipeRecord = BTreeMap<String, Option<String>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    #[error("{station} recipe row {row} is missing column `{column}`")]
    MissingColumn {
        station: Station,
        row: usize,
        column: String,
    },
    #[error("{station} recipe row {row} has a blank `{column}` input")]
    BlankInput {
        station: Station,
        row: usize,
        column: String,
    },
    #[error("{station} expects {expected} inputs, got {found}")]
    ArityMismatch {
        station: Station,
        expected: usize,
        found: usize,
    },
    #[error("no recipe table loaded for {0}")]
    MissingTable(Station),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRow {
    pub inputs: Vec<String>,
    pub outputs: Vec<Option<String>>,
}

impl RecipeRow {
    /// Output items in column order, skipping unused columns.
    pub fn produced(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().filter_map(|output| output.as_deref())
    }

    fn matches(&self, inputs: &[&str]) -> bool {
        self.inputs.len() == inputs.len()
            && self
                .inputs
                .iter()
                .zip(inputs)
                .all(|(expected, given)| expected == given)
    }
}

fn output_cell(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value == UNUSED_OUTPUT {
        None
    } else {
        Some(value.to_string())
    }
}

/// Immutable recipe rows for one station, matched on the exact input tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTable {
    station: Station,
    rows: Vec<RecipeRow>,
}

impl RecipeTable {
    pub fn from_rows(station: Station, rows: Vec<RecipeRow>) -> Result<Self, RecipeError> {
        let spec = station.spec();
        let mut normalized = Vec::with_capacity(rows.len());
        for row in rows {
            if row.inputs.len() != spec.arity() {
                return Err(RecipeError::ArityMismatch {
                    station,
                    expected: spec.arity(),
                    found: row.inputs.len(),
                });
            }
            let mut outputs: Vec<Option<String>> = row
                .outputs
                .iter()
                .take(spec.output_columns.len())
                .map(|output| output_cell(output.as_deref()))
                .collect();
            outputs.resize(spec.output_columns.len(), None);
            normalized.push(RecipeRow {
                inputs: row.inputs,
                outputs,
            });
        }
        Ok(Self {
            station,
            rows: normalized,
        })
    }

    /// Builds a table from column-keyed records using the station's schema.
    pub fn from_records(station: Station, records: &[RecipeRecord]) -> Result<Self, RecipeError> {
        let spec = station.spec();
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let mut inputs = Vec::with_capacity(spec.arity());
            for column in spec.input_columns {
                let cell = record.get(*column).ok_or_else(|| RecipeError::MissingColumn {
                    station,
                    row: index,
                    column: column.to_string(),
                })?;
                match cell.as_deref().map(str::trim) {
                    Some(value) if !value.is_empty() => inputs.push(value.to_string()),
                    _ => {
                        return Err(RecipeError::BlankInput {
                            station,
                            row: index,
                            column: column.to_string(),
                        })
                    }
                }
            }
            let mut outputs = Vec::with_capacity(spec.output_columns.len());
            for column in spec.output_columns {
                let cell = record.get(*column).ok_or_else(|| RecipeError::MissingColumn {
                    station,
                    row: index,
                    column: column.to_string(),
                })?;
                outputs.push(output_cell(cell.as_deref()));
            }
            rows.push(RecipeRow { inputs, outputs });
        }
        let table = Self { station, rows };
        for key in table.duplicate_keys() {
            log::warn!(
                "{station} recipe key ({}) appears more than once; the first row wins",
                key.join(", ")
            );
        }
        Ok(table)
    }

    pub fn station(&self) -> Station {
        self.station
    }

    pub fn rows(&self) -> &[RecipeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose inputs equal `inputs`, in order.
    pub fn lookup(&self, inputs: &[&str]) -> Option<&RecipeRow> {
        self.rows.iter().find(|row| row.matches(inputs))
    }

    /// Input keys shared by more than one row, in first-seen order.
    pub fn duplicate_keys(&self) -> Vec<Vec<String>> {
        let mut seen: HashSet<&[String]> = HashSet::new();
        let mut reported: HashSet<&[String]> = HashSet::new();
        let mut duplicates = Vec::new();
        for row in &self.rows {
            let key = row.inputs.as_slice();
            if !seen.insert(key) && reported.insert(key) {
                duplicates.push(key.to_vec());
            }
        }
        duplicates
    }
}

/// Every loaded recipe table, one per station.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    tables: BTreeMap<Station, RecipeTable>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: RecipeTable) -> Option<RecipeTable> {
        self.tables.insert(table.station(), table)
    }

    pub fn table(&self, station: Station) -> Result<&RecipeTable, RecipeError> {
        self.tables
            .get(&station)
            .ok_or(RecipeError::MissingTable(station))
    }

    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.tables.keys().copied()
    }
}

impl FromIterator<RecipeTable> for RecipeBook {
    fn from_iter<I: IntoIterator<Item = RecipeTable>>(iter: I) -> Self {
        let mut book = Self::new();
        for table in iter {
            book.insert(table);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, Option<&str>)]) -> RecipeRecord {
        cells
            .iter()
            .map(|(column, value)| (column.to_string(), value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn sentinel_outputs_are_unused() {
        let records = vec![record(&[
            ("Input", Some("Minor Healing Potion")),
            ("Output1", Some("Vital Essence")),
            ("Output2", Some("None")),
            ("Output3", None),
        ])];
        let table = RecipeTable::from_records(Station::Retort, &records).expect("table");
        let row = table.lookup(&["Minor Healing Potion"]).expect("row");
        assert_eq!(row.produced().collect::<Vec<_>>(), vec!["Vital Essence"]);
        assert_eq!(row.outputs.len(), 3);
    }

    #[test]
    fn lookup_is_exact_and_order_sensitive() {
        let records = vec![record(&[
            ("Solid1", Some("Iron Dust")),
            ("Solid2", Some("Coal")),
            ("Output", Some("Steel Powder")),
        ])];
        let table = RecipeTable::from_records(Station::Calcinator, &records).expect("table");
        assert!(table.lookup(&["Iron Dust", "Coal"]).is_some());
        assert!(table.lookup(&["Coal", "Iron Dust"]).is_none());
        assert!(table.lookup(&["iron dust", "Coal"]).is_none());
        assert!(table.lookup(&["Iron Dust"]).is_none());
    }

    #[test]
    fn missing_column_is_rejected() {
        let records = vec![record(&[("Solid", Some("Iron Ore"))])];
        let err = RecipeTable::from_records(Station::Mortar, &records).expect_err("must fail");
        assert_eq!(
            err,
            RecipeError::MissingColumn {
                station: Station::Mortar,
                row: 0,
                column: "Output".to_string(),
            }
        );
    }

    #[test]
    fn blank_input_is_rejected() {
        let records = vec![record(&[("Solid", Some("  ")), ("Output", Some("Dust"))])];
        let err = RecipeTable::from_records(Station::Mortar, &records).expect_err("must fail");
        assert!(matches!(err, RecipeError::BlankInput { row: 0, .. }));
    }

    #[test]
    fn duplicate_keys_keep_first_match() {
        let records = vec![
            record(&[("Solid", Some("Bone")), ("Output", Some("Bone Meal"))]),
            record(&[("Solid", Some("Bone")), ("Output", Some("Chalk"))]),
            record(&[("Solid", Some("Bone")), ("Output", Some("Grit"))]),
        ];
        let table = RecipeTable::from_records(Station::Mortar, &records).expect("table");
        assert_eq!(table.duplicate_keys(), vec![vec!["Bone".to_string()]]);
        let row = table.lookup(&["Bone"]).expect("row");
        assert_eq!(row.produced().next(), Some("Bone Meal"));
    }

    #[test]
    fn from_rows_checks_arity_and_pads_outputs() {
        let err = RecipeTable::from_rows(
            Station::Cauldron,
            vec![RecipeRow {
                inputs: vec!["Water".to_string()],
                outputs: vec![Some("Potion".to_string())],
            }],
        )
        .expect_err("arity");
        assert_eq!(
            err,
            RecipeError::ArityMismatch {
                station: Station::Cauldron,
                expected: 3,
                found: 1,
            }
        );

        let table = RecipeTable::from_rows(
            Station::Retort,
            vec![RecipeRow {
                inputs: vec!["Tonic".to_string()],
                outputs: vec![Some("Spark".to_string()), Some("None".to_string())],
            }],
        )
        .expect("table");
        assert_eq!(table.rows()[0].outputs, vec![Some("Spark".to_string()), None, None]);
    }

    #[test]
    fn book_reports_missing_tables() {
        let book: RecipeBook = vec![RecipeTable::from_rows(Station::Mortar, Vec::new())
            .expect("empty table")]
        .into_iter()
        .collect();
        assert!(book.table(Station::Mortar).is_ok());
        assert_eq!(
            book.table(Station::Cauldron).expect_err("missing"),
            RecipeError::MissingTable(Station::Cauldron)
        );
    }
}
