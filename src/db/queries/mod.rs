pub mod catalog;
pub mod customer;
pub mod professional;
pub mod reports;
pub mod requests;
