pub mod profile;
pub mod user;

pub mod prelude {
    pub use super::profile::*;
    pub use super::user::*;
}
