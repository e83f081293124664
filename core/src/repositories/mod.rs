//! Repository interfaces for the persistence layer.
//!
//! Concrete implementations live in the infrastructure crate; the domain
//! layer only sees these traits.

pub mod blacklist;
pub mod driver;
pub mod ride;
pub mod token;
pub mod user;

pub use blacklist::TokenBlacklistRepository;
pub use driver::DriverRepository;
pub use ride::RideRepository;
pub use token::RefreshTokenRepository;
pub use user::UserRepository;
