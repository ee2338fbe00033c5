use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::ClassroomError;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::services::{bad_request, internal_error};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    mut create_request: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    create_request.username = create_request.username.trim().to_string();
    create_request.email = create_request.email.trim().to_lowercase();

    // 1. 字段校验
    if let Err(msg) = validate_username(&create_request.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&create_request.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password(&create_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    // 2. 用户名、邮箱均不可重复
    for identifier in [&create_request.username, &create_request.email] {
        if let Err(response) = check_user_exists(&storage, identifier).await {
            return Ok(response);
        }
    }

    // 3. 将明文密码替换为哈希
    create_request.password = match hash_password(&create_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Register failed", &e)),
    };

    // 4. 创建用户
    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered as {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Register successful")))
        }
        Err(ClassroomError::Conflict(msg)) => Ok(user_exists(msg)),
        Err(e) => Ok(internal_error("Register failed", &e)),
    }
}

async fn check_user_exists(storage: &Arc<dyn Storage>, identifier: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_username_or_email(identifier).await {
        Ok(Some(_)) => Err(user_exists("Username or email already exists")),
        Ok(None) => Ok(()),
        Err(e) => Err(internal_error("Register failed", &e)),
    }
}

fn user_exists(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::UserAlreadyExists,
        message,
    ))
}
