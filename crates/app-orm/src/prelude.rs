pub use super::profiles::Entity as Profiles;
pub use super::users::Entity as Users;
