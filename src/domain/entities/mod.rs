pub mod assignment;
pub mod balance;
pub mod holiday;
pub mod worker;

pub use assignment::*;
pub use balance::*;
pub use holiday::*;
pub use worker::*;
