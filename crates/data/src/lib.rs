//! Loading and validation of recipe tables, levels and game config.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
