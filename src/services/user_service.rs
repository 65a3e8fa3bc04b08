use serde::{Deserialize, Serialize};

use crate::database::IdentityStore;
use crate::models::{Role, UpdateOutcome, UserFilter, UserPatch, UserView};
use crate::utils::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    pub success: bool,
    pub role: Role,
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

pub async fn get_role(store: &dyn IdentityStore, email: &str) -> Result<RoleResponse, AppError> {
    let user = store.find_one(email).await?.ok_or(AppError::UserNotFound)?;

    Ok(RoleResponse {
        success: true,
        role: user.role,
        name: user.name,
        photo_url: user.photo_url,
    })
}

/// Sets the role of the user with `email`. Setting the role it already has is not an error.
pub async fn update_role(store: &dyn IdentityStore, email: &str, role: Role) -> Result<(), AppError> {
    let outcome = store
        .update_one(&UserFilter::Email(email.to_string()), &UserPatch::role(role))
        .await?;

    if outcome.matched == 0 {
        return Err(AppError::UserNotFound);
    }
    Ok(())
}

pub async fn list_users(store: &dyn IdentityStore) -> Result<Vec<UserView>, AppError> {
    let users = store.find_all().await?;
    Ok(users.into_iter().map(UserView::from).collect())
}

pub async fn delete_user(store: &dyn IdentityStore, id: &str) -> Result<u64, AppError> {
    let filter = UserFilter::by_id(id).map_err(AppError::InvalidRequest)?;
    Ok(store.delete_one(&filter).await?)
}

pub async fn update_user(
    store: &dyn IdentityStore,
    id: &str,
    patch: &UserPatch,
) -> Result<UpdateOutcome, AppError> {
    let filter = UserFilter::by_id(id).map_err(AppError::InvalidRequest)?;
    if patch.is_empty() {
        return Err(AppError::InvalidRequest("Nothing to update".to_string()));
    }
    Ok(store.update_one(&filter, patch).await?)
}
