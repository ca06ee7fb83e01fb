//! Ingredient bookkeeping and recipe resolution. Keep this crate free of IO.

pub mod category;
pub mod config;
pub mod events;
pub mod inventory;
pub mod level;
pub mod progress;
pub mod recipe;
pub mod reserved;
pub mod resolver;
pub mod session;
pub mod station;

pub use category::*;
pub use config::*;
pub use events::*;
pub use inventory::*;
pub use level::*;
pub use progress::*;
pub use recipe::*;
pub use reserved::*;
pub use resolver::*;
pub use session::*;
pub use station::*;
