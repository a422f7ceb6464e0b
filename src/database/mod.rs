pub mod memory;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::models::{Complaint, ComplaintStatus, ContactMessage, ProfileUpdate, User};
use crate::utils::AppError;

pub use memory::MemoryStore;

const USERS: &str = "users";
const COMPLAINTS: &str = "complaints";
const CONTACT_MESSAGES: &str = "contact_messages";

/// Persistence operations the handlers need.
///
/// Complaints live in a single collection keyed by `id` and indexed by
/// `userId`; the per-user view is a query, not a second copy.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Returns the updated user, or `None` when it does not exist.
    async fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> Result<Option<User>, AppError>;

    async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), AppError>;
    async fn find_complaint(&self, complaint_id: &str) -> Result<Option<Complaint>, AppError>;
    /// Oldest first.
    async fn complaints_for_user(&self, user_id: &str) -> Result<Vec<Complaint>, AppError>;
    /// Returns the updated complaint, or `None` when it does not exist.
    async fn set_complaint_status(
        &self,
        complaint_id: &str,
        status: &ComplaintStatus,
        updated_at: &str,
    ) -> Result<Option<Complaint>, AppError>;

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Database name from the URI path, if any
        let db_name = uri
            .rsplit('/')
            .next()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty() && !s.contains(':') && !s.contains('@'))
            .unwrap_or("complaint_portal");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let store = Self { db };
        store.ensure_indexes().await?;

        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: Vec<(&str, IndexModel)> = vec![
            (USERS, IndexModel::builder().keys(doc! { "id": 1 }).options(unique()).build()),
            (USERS, IndexModel::builder().keys(doc! { "email": 1 }).options(unique()).build()),
            (COMPLAINTS, IndexModel::builder().keys(doc! { "id": 1 }).options(unique()).build()),
            (COMPLAINTS, IndexModel::builder().keys(doc! { "userId": 1, "createdAt": 1 }).build()),
        ];

        for (collection, index) in indexes {
            let keys = index.keys.clone();
            match self.collection::<Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: {}({})", collection, keys),
                Err(e) => log::debug!("   ℹ️  Index not created on {}: {}", collection, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

// `_id` is driver bookkeeping; the flattened complaint details would
// otherwise pick it up.
fn without_object_id() -> Document {
    doc! { "_id": 0 }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.collection::<User>(USERS).insert_one(user).await?;
        Ok(())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "id": user_id })
            .projection(without_object_id())
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .projection(without_object_id())
            .await?)
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> Result<Option<User>, AppError> {
        let mut set = doc! { "updatedAt": updated_at };
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(phone) = &update.phone {
            set.insert("phone", phone.as_str());
        }

        Ok(self
            .collection::<User>(USERS)
            .find_one_and_update(doc! { "id": user_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .projection(without_object_id())
            .await?)
    }

    async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), AppError> {
        self.collection::<Complaint>(COMPLAINTS)
            .insert_one(complaint)
            .await?;
        Ok(())
    }

    async fn find_complaint(&self, complaint_id: &str) -> Result<Option<Complaint>, AppError> {
        Ok(self
            .collection::<Complaint>(COMPLAINTS)
            .find_one(doc! { "id": complaint_id })
            .projection(without_object_id())
            .await?)
    }

    async fn complaints_for_user(&self, user_id: &str) -> Result<Vec<Complaint>, AppError> {
        let cursor = self
            .collection::<Complaint>(COMPLAINTS)
            .find(doc! { "userId": user_id })
            .sort(doc! { "createdAt": 1 })
            .projection(without_object_id())
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn set_complaint_status(
        &self,
        complaint_id: &str,
        status: &ComplaintStatus,
        updated_at: &str,
    ) -> Result<Option<Complaint>, AppError> {
        let update = doc! {
            "$set": {
                "status": status.as_str(),
                "updatedAt": updated_at,
            }
        };

        Ok(self
            .collection::<Complaint>(COMPLAINTS)
            .find_one_and_update(doc! { "id": complaint_id }, update)
            .return_document(ReturnDocument::After)
            .projection(without_object_id())
            .await?)
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), AppError> {
        self.collection::<ContactMessage>(CONTACT_MESSAGES)
            .insert_one(message)
            .await?;
        Ok(())
    }
}
