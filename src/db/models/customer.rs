use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow, ToSchema)]
pub struct Customer {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub address: String,
    pub pin_code: String,
    pub contact: String,
    pub created_on: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewCustomer {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub address: String,
    pub pin_code: String,
    pub contact: String,
}
