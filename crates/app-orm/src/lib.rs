//! SeaORM entity definitions shared by the feature crates.

pub mod prelude;

pub mod profiles;
pub mod users;
