//! Domain entities.

pub mod driver;
pub mod ride;
pub mod token;
pub mod user;

pub use driver::{Driver, VehicleType};
pub use ride::{CargoSize, Location, Ride, RideStatus};
pub use token::{BlacklistEntry, Claims, RefreshToken, TokenPair};
pub use user::{User, UserRole};
