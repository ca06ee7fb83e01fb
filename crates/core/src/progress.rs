use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelRecord {
    #[serde(default)]
    pub best_retries: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

/// Per-level completion and best retry count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelProgress {
    #[serde(default)]
    levels: BTreeMap<u32, LevelRecord>,
}

impl LevelProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level_info(&self, level: u32) -> LevelRecord {
        self.levels.get(&level).copied().unwrap_or_default()
    }

    pub fn best_retries(&self, level: u32) -> Option<u32> {
        self.level_info(level).best_retries
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.level_info(level).completed
    }

    /// Marks `level` completed. Returns true when `retries` is a new best.
    pub fn record_completion(&mut self, level: u32, retries: u32) -> bool {
        let record = self.levels.entry(level).or_default();
        record.completed = true;
        match record.best_retries {
            Some(best) if best <= retries => false,
            _ => {
                record.best_retries = Some(retries);
                true
            }
        }
    }

    pub fn completed_levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels
            .iter()
            .filter(|(_, record)| record.completed)
            .map(|(level, _)| *level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_lowest_retry_count() {
        let mut progress = LevelProgress::new();
        assert!(!progress.is_completed(2));
        assert_eq!(progress.best_retries(2), None);

        assert!(progress.record_completion(2, 3));
        assert!(!progress.record_completion(2, 5));
        assert!(!progress.record_completion(2, 3));
        assert!(progress.record_completion(2, 1));

        assert!(progress.is_completed(2));
        assert_eq!(progress.best_retries(2), Some(1));
        assert_eq!(progress.completed_levels().collect::<Vec<_>>(), vec![2]);
    }
}
