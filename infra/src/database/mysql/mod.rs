//! MySQL repository implementations.

pub mod blacklist_repository_impl;
pub mod driver_repository_impl;
pub mod ride_repository_impl;
pub mod token_repository_impl;
pub mod user_repository_impl;

pub use blacklist_repository_impl::MySqlTokenBlacklistRepository;
pub use driver_repository_impl::MySqlDriverRepository;
pub use ride_repository_impl::MySqlRideRepository;
pub use token_repository_impl::MySqlRefreshTokenRepository;
pub use user_repository_impl::MySqlUserRepository;
