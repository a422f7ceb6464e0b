use bcrypt::{hash, verify};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::database::Store;
use crate::models::{ProfileUpdate, User, UserInfo};
use crate::utils::AppError;

/// bcrypt work factor for stored passwords
pub const PASSWORD_COST: u32 = 12;

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserInfo,
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(trimmed)
}

// User registration
pub async fn register(store: &dyn Store, request: &RegisterRequest) -> Result<RegisterResponse, AppError> {
    let name = required(&request.name, "Name")?;
    let email = required(&request.email, "Email")?;
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password is required".to_string()));
    }

    if store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    let hashed_password = hash(&request.password, PASSWORD_COST)?;

    let new_user = User {
        id: ObjectId::new().to_hex(),
        name: name.to_string(),
        email: email.to_string(),
        phone: request.phone.as_deref().unwrap_or_default().trim().to_string(),
        password: hashed_password,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };

    store.insert_user(&new_user).await?;

    log::info!("✅ User registered successfully: {}", new_user.email);

    Ok(RegisterResponse {
        success: true,
        user_id: new_user.id,
    })
}

// User login
pub async fn login(store: &dyn Store, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    let email = required(&request.email, "Email")?;
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password is required".to_string()));
    }

    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify(&request.password, &user.password)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    Ok(LoginResponse {
        success: true,
        user: UserInfo::from(user),
    })
}

pub async fn get_profile(store: &dyn Store, user_id: &str) -> Result<UserInfo, AppError> {
    store
        .find_user(user_id)
        .await?
        .map(UserInfo::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn update_profile(
    store: &dyn Store,
    user_id: &str,
    update: &ProfileUpdate,
) -> Result<UserInfo, AppError> {
    let update = update.normalized();
    if update.is_empty() {
        return Err(AppError::InvalidRequest(
            "Provide a name or phone to update".to_string(),
        ));
    }

    store
        .update_user_profile(user_id, &update, &Utc::now().to_rfc3339())
        .await?
        .map(UserInfo::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
