use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog entry customers can request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, ToSchema)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub duration_minutes: i64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct NewService {
    pub name: String,
    pub price: i64,
    pub duration_minutes: i64,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct UpdateService {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
}

impl UpdateService {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.duration_minutes.is_none()
            && self.description.is_none()
    }
}
