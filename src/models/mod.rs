pub mod account;

pub use account::AccountBalance;
