use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::ClassroomError;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let class_code = join_data.class_code.trim().to_uppercase();
    let class = match storage.get_class_by_code(&class_code).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassInviteCodeInvalid,
                "Class code is invalid",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to join class", &e)),
    };

    match storage.join_class(class.id, user.id).await {
        Ok(()) => {
            info!("Student {} joined class {}", user.id, class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Joined class successfully")))
        }
        Err(ClassroomError::Conflict(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "You have already joined this class",
            )))
        }
        Err(e) => Ok(internal_error("Failed to join class", &e)),
    }
}
