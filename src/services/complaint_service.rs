use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::Value;

use crate::database::Store;
use crate::models::{Complaint, ComplaintStatus, Sector};
use crate::services::email_service::EmailService;
use crate::utils::AppError;

/// Per-status and per-sector counts for a set of complaints.
#[derive(Debug, Default, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
    /// Statuses outside the four known labels
    pub other: usize,
    pub by_sector: SectorCounts,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SectorCounts {
    pub food: usize,
    pub hospital: usize,
    pub hotel: usize,
}

impl ComplaintStats {
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        let mut stats = ComplaintStats {
            total: complaints.len(),
            ..Default::default()
        };

        for complaint in complaints {
            match complaint.status() {
                ComplaintStatus::Pending => stats.pending += 1,
                ComplaintStatus::InProgress => stats.in_progress += 1,
                ComplaintStatus::Resolved => stats.resolved += 1,
                ComplaintStatus::Rejected => stats.rejected += 1,
                ComplaintStatus::Other(_) => stats.other += 1,
            }
            match complaint.sector {
                Sector::Food => stats.by_sector.food += 1,
                Sector::Hospital => stats.by_sector.hospital += 1,
                Sector::Hotel => stats.by_sector.hotel += 1,
            }
        }

        stats
    }
}

/// Stores a new complaint and returns its id.
///
/// The confirmation email is best-effort: a delivery failure is logged and
/// the submission still succeeds.
pub async fn submit_complaint(
    store: &dyn Store,
    email: &EmailService,
    payload: Value,
) -> Result<String, AppError> {
    let complaint = Complaint::from_submission(payload, ObjectId::new().to_hex(), Utc::now())?;

    store.insert_complaint(&complaint).await?;

    log::info!(
        "✅ Complaint {} stored ({}, user: {})",
        complaint.id,
        complaint.sector,
        complaint.user_id().unwrap_or("anonymous")
    );

    if let Some(to) = complaint.email() {
        if let Err(e) = email.send_complaint_confirmation(to, &complaint).await {
            log::warn!("⚠️  Confirmation email for {} not sent: {}", complaint.id, e);
        }
    }

    Ok(complaint.id)
}

pub async fn list_for_user(store: &dyn Store, user_id: &str) -> Result<Vec<Complaint>, AppError> {
    store.complaints_for_user(user_id).await
}

pub async fn get_complaint(store: &dyn Store, complaint_id: &str) -> Result<Complaint, AppError> {
    store
        .find_complaint(complaint_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))
}

pub async fn stats_for_user(store: &dyn Store, user_id: &str) -> Result<ComplaintStats, AppError> {
    let complaints = store.complaints_for_user(user_id).await?;
    Ok(ComplaintStats::from_complaints(&complaints))
}

/// Moves a complaint to one of the known statuses and notifies the submitter.
pub async fn update_status(
    store: &dyn Store,
    email: &EmailService,
    complaint_id: &str,
    status: &str,
) -> Result<Complaint, AppError> {
    let status = ComplaintStatus::parse_known(status).ok_or_else(|| {
        AppError::InvalidRequest(
            "Status must be one of Pending, In Progress, Resolved or Rejected".to_string(),
        )
    })?;

    let complaint = store
        .set_complaint_status(complaint_id, &status, &Utc::now().to_rfc3339())
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    log::info!("🔄 Complaint {} is now {}", complaint.id, complaint.status());

    if let Some(to) = complaint.email() {
        if let Err(e) = email.send_status_update(to, &complaint).await {
            log::warn!("⚠️  Status email for {} not sent: {}", complaint.id, e);
        }
    }

    Ok(complaint)
}
