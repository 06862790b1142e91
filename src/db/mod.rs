pub mod connection;
pub mod events;
pub mod loads;

pub use connection::Database;
