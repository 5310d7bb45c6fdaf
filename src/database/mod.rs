pub mod connection;
pub mod memory;
