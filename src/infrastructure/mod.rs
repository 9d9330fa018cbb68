pub mod observability;
pub mod postgrest;
pub mod runtime;
pub mod storage;
