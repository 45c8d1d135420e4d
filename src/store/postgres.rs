use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, info};

use super::{Store, StoreError, UnitOfWork};
use crate::{
    ads::{
        repo as ads_repo,
        repo_types::{Advertisement, AdvertisementChanges, NewAdvertisement},
    },
    config::DatabaseConfig,
    users::{
        repo as users_repo,
        repo_types::{NewUser, User, UserChanges},
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects the pool and brings the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;

        info!(host = %config.host, db = %config.name, "database ready");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(PgUnitOfWork {
            pool: self.pool.clone(),
            tx: None,
        }))
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// The transaction is only opened by the first query, so requests rejected
/// before touching the store never check out a connection.
pub struct PgUnitOfWork {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    async fn conn(&mut self) -> Result<&mut PgConnection, StoreError> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => {
                debug!("opening transaction");
                self.pool.begin().await?
            }
        };
        Ok(&mut **self.tx.insert(tx))
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn get_user(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(users_repo::find_by_id(self.conn().await?, id).await?)
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        Ok(users_repo::insert(self.conn().await?, &user).await?)
    }

    async fn update_user(
        &mut self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        Ok(users_repo::update(self.conn().await?, id, &changes).await?)
    }

    async fn delete_user(&mut self, id: i32) -> Result<bool, StoreError> {
        Ok(users_repo::delete(self.conn().await?, id).await?)
    }

    async fn get_advertisement(&mut self, id: i32) -> Result<Option<Advertisement>, StoreError> {
        Ok(ads_repo::find_by_id(self.conn().await?, id).await?)
    }

    async fn insert_advertisement(
        &mut self,
        adv: NewAdvertisement,
    ) -> Result<Advertisement, StoreError> {
        Ok(ads_repo::insert(self.conn().await?, &adv).await?)
    }

    async fn update_advertisement(
        &mut self,
        id: i32,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        Ok(ads_repo::update(self.conn().await?, id, &changes).await?)
    }

    async fn delete_advertisement(&mut self, id: i32) -> Result<bool, StoreError> {
        Ok(ads_repo::delete(self.conn().await?, id).await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if let Some(tx) = self.tx {
            tx.commit().await?;
            debug!("unit of work committed");
        }
        Ok(())
    }
}
