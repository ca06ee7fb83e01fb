use crate::{Category, MixOutcome, Station};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    ItemPlaced {
        station: Station,
        slot: usize,
        item: String,
        category: Category,
    },
    ItemTaken {
        station: Station,
        slot: usize,
        item: String,
    },
    Mixed {
        station: Station,
        outcome: MixOutcome,
    },
    LevelCompleted { level: u32, retries: u32 },
    LevelRetried { level: u32, retries: u32 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
