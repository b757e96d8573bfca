use crate::entities::{Role, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::ProfileResponse;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取用户个人资料（角色、余额）
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<ProfileResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        Ok(user.into())
    }

    /// Role of the requesting user, used for authorization checks.
    ///
    /// A token whose subject has no profile row cannot be authorized, so a
    /// missing profile is reported as an authentication failure.
    pub async fn get_role(&self, user_id: Uuid) -> AppResult<Role> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                log::warn!("Profile not found for requesting user {user_id}");
                AppError::AuthError("Requesting user profile not found".to_string())
            })?;

        Ok(user.role)
    }
}
