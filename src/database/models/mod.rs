pub mod account;
pub mod catalog;

pub use account::Account;
pub use catalog::{Book, Category, Chapter};
