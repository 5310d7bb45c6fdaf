pub mod close_funds;
