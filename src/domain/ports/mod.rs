pub mod assignment_repository;
pub mod auth_provider;
pub mod balance_repository;
pub mod clock;
pub mod holiday_repository;
pub mod key_value_store;
pub mod worker_repository;

pub use assignment_repository::AssignmentRepository;
pub use auth_provider::AuthProvider;
pub use balance_repository::BalanceRepository;
pub use clock::Clock;
pub use holiday_repository::HolidayRepository;
pub use key_value_store::KeyValueStore;
pub use worker_repository::WorkerRepository;
