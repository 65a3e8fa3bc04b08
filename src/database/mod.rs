use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::fmt;

use crate::models::{UpdateOutcome, User, UserFilter, UserPatch};
use crate::utils::AppError;

#[cfg(test)]
pub mod memory;

const USERS: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Unique index on `email` rejected the write
    Duplicate,
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate => write!(f, "duplicate key"),
            StoreError::Unavailable(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match *e.kind {
            ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == DUPLICATE_KEY => {
                StoreError::Duplicate
            }
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

/// Access to the user documents. Every method is a single store round-trip.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_one(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert_one(&self, user: &User) -> Result<ObjectId, StoreError>;
    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> Result<UpdateOutcome, StoreError>;
    async fn delete_one(&self, filter: &UserFilter) -> Result<u64, StoreError>;
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { client, db };

        // Test connection
        mongodb.ping().await?;

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique index on users(email); duplicate registrations are rejected here.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        log::info!("🔧 Creating database indexes...");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection::<Document>(USERS)
            .create_index(email_index)
            .await?;

        log::info!("   ✅ Index ready: users(email) unique");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    /// Closes the pool; call once the HTTP server has stopped
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

fn filter_doc(filter: &UserFilter) -> Document {
    match filter {
        UserFilter::Email(email) => doc! { "email": email },
        UserFilter::Id(id) => doc! { "_id": id },
    }
}

fn set_doc(patch: &UserPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(photo_url) = &patch.photo_url {
        set.insert("photoURL", photo_url.as_str());
    }
    if let Some(role) = patch.role {
        set.insert("role", role.as_str());
    }
    doc! { "$set": set }
}

#[async_trait]
impl IdentityStore for MongoDB {
    async fn find_one(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_one(&self, user: &User) -> Result<ObjectId, StoreError> {
        let result = self.users().insert_one(user).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Unavailable("inserted id is not an ObjectId".to_string()))
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .users()
            .update_one(filter_doc(filter), set_doc(patch))
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: &UserFilter) -> Result<u64, StoreError> {
        let result = self.users().delete_one(filter_doc(filter)).await?;
        Ok(result.deleted_count)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
