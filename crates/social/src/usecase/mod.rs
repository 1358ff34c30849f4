pub mod profile;
pub mod suggestion;
pub mod user;
