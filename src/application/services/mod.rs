pub mod agenda_service;
pub mod auth_service;
pub mod balance_service;

pub use agenda_service::*;
pub use auth_service::*;
pub use balance_service::*;
