pub mod continent;
pub mod country;
pub mod favourite;
pub mod user;
pub mod visited;
