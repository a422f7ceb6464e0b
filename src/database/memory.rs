use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::models::{Complaint, ComplaintStatus, ContactMessage, ProfileUpdate, User};
use crate::utils::AppError;

/// In-process store for local development (`DATABASE_URL=memory://`) and tests.
///
/// Vectors keep insertion order, which matches `createdAt` order for records
/// created through the services.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    complaints: RwLock<Vec<Complaint>>,
    contact_messages: RwLock<Vec<ContactMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub async fn contact_messages(&self) -> Vec<ContactMessage> {
        self.contact_messages.read().await.clone()
    }

    pub async fn complaint_count(&self) -> usize {
        self.complaints.read().await.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        // Mirrors the unique index on users.email
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DatabaseError(format!(
                "duplicate key: email {}",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            user.phone = phone.clone();
        }
        user.updated_at = Some(updated_at.to_string());

        Ok(Some(user.clone()))
    }

    async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), AppError> {
        self.complaints.write().await.push(complaint.clone());
        Ok(())
    }

    async fn find_complaint(&self, complaint_id: &str) -> Result<Option<Complaint>, AppError> {
        let complaints = self.complaints.read().await;
        Ok(complaints.iter().find(|c| c.id == complaint_id).cloned())
    }

    async fn complaints_for_user(&self, user_id: &str) -> Result<Vec<Complaint>, AppError> {
        let complaints = self.complaints.read().await;
        Ok(complaints
            .iter()
            .filter(|c| c.user_id() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn set_complaint_status(
        &self,
        complaint_id: &str,
        status: &ComplaintStatus,
        updated_at: &str,
    ) -> Result<Option<Complaint>, AppError> {
        let mut complaints = self.complaints.write().await;
        let Some(complaint) = complaints.iter_mut().find(|c| c.id == complaint_id) else {
            return Ok(None);
        };

        complaint.set_status(status);
        complaint.updated_at = Some(updated_at.to_string());

        Ok(Some(complaint.clone()))
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), AppError> {
        self.contact_messages.write().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sector;
    use serde_json::{json, Map};

    fn complaint(id: &str, user_id: Option<&str>) -> Complaint {
        let mut details = Map::new();
        details.insert("status".to_string(), json!("Pending"));
        details.insert("description".to_string(), json!("Cold soup"));
        if let Some(user_id) = user_id {
            details.insert("userId".to_string(), json!(user_id));
        }
        Complaint {
            id: id.to_string(),
            sector: Sector::Food,
            created_at: "2025-06-14T15:07:09+00:00".to_string(),
            updated_at: None,
            details,
        }
    }

    #[tokio::test]
    async fn test_complaints_for_user_filters_and_keeps_order() {
        let store = MemoryStore::new();
        store.insert_complaint(&complaint("a", Some("u1"))).await.unwrap();
        store.insert_complaint(&complaint("b", Some("u2"))).await.unwrap();
        store.insert_complaint(&complaint("c", Some("u1"))).await.unwrap();
        store.insert_complaint(&complaint("d", None)).await.unwrap();

        let ids: Vec<String> = store
            .complaints_for_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.complaint_count().await, 4);
    }

    #[tokio::test]
    async fn test_set_status_on_missing_complaint_returns_none() {
        let store = MemoryStore::new();
        let updated = store
            .set_complaint_status("nope", &ComplaintStatus::Resolved, "now")
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: String::new(),
            password: "hash".to_string(),
            created_at: "2025-06-14T15:07:09+00:00".to_string(),
            updated_at: None,
        };
        store.insert_user(&user).await.unwrap();

        let again = User { id: "u2".to_string(), ..user };
        assert!(store.insert_user(&again).await.is_err());
    }
}
