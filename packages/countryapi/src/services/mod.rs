pub mod aggregation;
pub mod continent;
pub mod country;
pub mod credential;
pub mod list;

pub use aggregation::Aggregator;
pub use continent::ContinentCatalog;
pub use country::CountryRegistry;
pub use credential::{CredentialStore, IssuedToken};
pub use list::{ListKind, PersonalList};
