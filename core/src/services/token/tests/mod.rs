//! Unit tests for the token lifecycle services.

mod mocks;
mod service_tests;
