use async_trait::async_trait;
use thiserror::Error;

use crate::{
    ads::repo_types::{Advertisement, AdvertisementChanges, NewAdvertisement},
    users::repo_types::{NewUser, User, UserChanges},
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or foreign-key constraint rejected the write.
    #[error("integrity constraint violated")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                StoreError::Conflict
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Handle to the relational store, shared by all requests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Opens the request-scoped unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    async fn close(&self);
}

/// One transaction against the store. Dropping it without `commit` rolls back.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn get_user(&mut self, id: i32) -> Result<Option<User>, StoreError>;
    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError>;
    async fn update_user(
        &mut self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;
    async fn delete_user(&mut self, id: i32) -> Result<bool, StoreError>;

    async fn get_advertisement(&mut self, id: i32) -> Result<Option<Advertisement>, StoreError>;
    async fn insert_advertisement(
        &mut self,
        adv: NewAdvertisement,
    ) -> Result<Advertisement, StoreError>;
    async fn update_advertisement(
        &mut self,
        id: i32,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError>;
    async fn delete_advertisement(&mut self, id: i32) -> Result<bool, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
