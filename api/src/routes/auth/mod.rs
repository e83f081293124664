//! Authentication route handlers:
//! - Login (credential exchange for a token pair)
//! - Token refresh (single-use rotation)
//! - Logout (one device or all devices)

pub mod login;
pub mod logout;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
