use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::responses::ClassListResponse;
use crate::models::{ApiResponse, users::entities::UserRole};
use crate::services::{current_user, internal_error};

pub async fn list_classes(service: &ClassService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let result = match user.role {
        UserRole::Teacher => storage.list_teacher_classes(user.id).await,
        UserRole::Student => storage.list_student_classes(user.id).await,
    };

    match result {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassListResponse { items },
            "Classes retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list classes", &e)),
    }
}
