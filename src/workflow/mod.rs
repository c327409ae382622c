//! Marketplace operations. Each function takes the pool and the calling
//! [`Principal`](crate::db::models::user::Principal) and runs as one
//! transaction where it writes.

pub mod accounts;
pub mod approval;
pub mod catalog;
pub mod rating;
pub mod reports;
pub mod requests;

use chrono::{Local, NaiveDate};

/// Calendar date used for request and completion dates.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
