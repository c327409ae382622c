use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::db::models::customer::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, address, pin_code, contact, created_on";

pub async fn find_customer<'e, E>(executor: E, customer_id: i64) -> Result<Option<Customer>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"
    ))
    .bind(customer_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_customer_by_username<'e, E>(
    executor: E,
    username: &str,
) -> Result<Option<Customer>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await
}

pub async fn insert_customer<'e, E>(
    executor: E,
    new: &NewCustomer,
    password_hash: &str,
    created_on: NaiveDate,
) -> Result<Customer, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Customer>(&format!(
        r#"INSERT INTO customers
               (username, password_hash, first_name, last_name, address, pin_code, contact, created_on)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING {CUSTOMER_COLUMNS}"#
    ))
    .bind(&new.username)
    .bind(password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.address)
    .bind(&new.pin_code)
    .bind(&new.contact)
    .bind(created_on)
    .fetch_one(executor)
    .await
}
