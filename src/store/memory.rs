//! In-memory store used by the handler tests. Each unit of work edits a
//! snapshot of the tables; `commit` publishes it, dropping discards it.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Store, StoreError, UnitOfWork};
use crate::{
    ads::repo_types::{Advertisement, AdvertisementChanges, NewAdvertisement},
    users::repo_types::{NewUser, User, UserChanges},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    ads: BTreeMap<i32, Advertisement>,
    last_user_id: i32,
    last_ad_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn advertisement(&self, id: i32) -> Option<Advertisement> {
        self.tables.lock().unwrap().ads.get(&id).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let snapshot = self.tables.lock().unwrap().clone();
        Ok(Box::new(MemoryUnitOfWork {
            shared: Arc::clone(&self.tables),
            tables: snapshot,
        }))
    }

    async fn close(&self) {}
}

struct MemoryUnitOfWork {
    shared: Arc<Mutex<Tables>>,
    tables: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn get_user(&mut self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.tables.users.get(&id).cloned())
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        if self.tables.email_taken(&user.email, None) {
            return Err(StoreError::Conflict);
        }
        self.tables.last_user_id += 1;
        let record = User {
            id: self.tables.last_user_id,
            name: user.name,
            password: user.password_hash,
            email: user.email,
            registration_time: OffsetDateTime::now_utc(),
        };
        self.tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_user(
        &mut self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        if let Some(email) = &changes.email {
            if self.tables.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict);
            }
        }
        let Some(user) = self.tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password_hash {
            user.password = password;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&mut self, id: i32) -> Result<bool, StoreError> {
        if self.tables.ads.values().any(|a| a.creator == id) {
            return Err(StoreError::Conflict);
        }
        Ok(self.tables.users.remove(&id).is_some())
    }

    async fn get_advertisement(&mut self, id: i32) -> Result<Option<Advertisement>, StoreError> {
        Ok(self.tables.ads.get(&id).cloned())
    }

    async fn insert_advertisement(
        &mut self,
        adv: NewAdvertisement,
    ) -> Result<Advertisement, StoreError> {
        if !self.tables.users.contains_key(&adv.creator) {
            return Err(StoreError::Conflict);
        }
        self.tables.last_ad_id += 1;
        let record = Advertisement {
            id: self.tables.last_ad_id,
            heading: adv.heading,
            description: adv.description,
            date_creation: OffsetDateTime::now_utc().date(),
            creator: adv.creator,
        };
        self.tables.ads.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_advertisement(
        &mut self,
        id: i32,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        let Some(adv) = self.tables.ads.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(heading) = changes.heading {
            adv.heading = heading;
        }
        if let Some(description) = changes.description {
            adv.description = description;
        }
        Ok(Some(adv.clone()))
    }

    async fn delete_advertisement(&mut self, id: i32) -> Result<bool, StoreError> {
        Ok(self.tables.ads.remove(&id).is_some())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnitOfWork { shared, tables } = *self;
        *shared.lock().unwrap() = tables;
        Ok(())
    }
}
