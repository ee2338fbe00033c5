use super::{SeaOrmStorage, map_write_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{ClassroomError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建用户失败", "用户名或邮箱已存在"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn new_user(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hashed".to_string(),
            role: UserRole::Teacher,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_username_or_email() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_user_impl(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_name = storage
            .get_user_by_username_or_email_impl("alice")
            .await
            .unwrap()
            .unwrap();
        let by_email = storage
            .get_user_by_username_or_email_impl("alice@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_name.role, UserRole::Teacher);
        assert!(
            storage
                .get_user_by_username_or_email_impl("bob")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(new_user("alice", "a1@example.com"))
            .await
            .unwrap();

        let err = storage
            .create_user_impl(new_user("alice", "a2@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClassroomError::Conflict(_)));
    }
}
