use serde::Serialize;
use sqlx::FromRow;
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Advertisement record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Advertisement {
    pub id: i32,
    pub heading: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date_creation: Date,
    pub creator: i32, // app_user.id
}

#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub heading: String,
    pub description: String,
    pub creator: i32,
}

#[derive(Debug, Clone, Default)]
pub struct AdvertisementChanges {
    pub heading: Option<String>,
    pub description: Option<String>,
}

impl AdvertisementChanges {
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.description.is_none()
    }
}
