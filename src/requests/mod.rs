pub mod donation;
pub mod fund;
