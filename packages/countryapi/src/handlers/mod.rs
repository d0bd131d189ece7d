pub mod auth;
pub mod continent;
pub mod country;
pub mod list;
