pub mod customer;
pub mod professional;
pub mod requests;
pub mod service;
pub mod user;
