//! Domain entities exchanged with the matters backend.

pub mod customer;
pub mod matter;
pub mod types;
pub mod user;
