pub mod profile;
pub mod suggestion;
pub mod user;

pub mod prelude {
    pub use super::profile::*;
    pub use super::suggestion::*;
    pub use super::user::*;
}
