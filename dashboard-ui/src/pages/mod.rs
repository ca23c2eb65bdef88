//! Pages
//!
//! Top-level page components for each route.

pub mod auth;
pub mod historical;
pub mod home;
pub mod monitoring;

pub use auth::{Login, Register};
pub use historical::Historical;
pub use home::Home;
pub use monitoring::Monitoring;
