use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::{requests::AssignmentListQuery, responses::AssignmentListResponse};
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::{bad_request, current_user, internal_error};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    // 教师只看自己布置的作业；学生必须指定已加入的班级
    let created_by = match user.role {
        UserRole::Teacher => Some(user.id),
        UserRole::Student => {
            let Some(class_id) = query.class_id else {
                return Ok(bad_request(ErrorCode::BadRequest, "class_id is required"));
            };
            match storage.is_class_student(class_id, user.id).await {
                Ok(true) => None,
                Ok(false) => {
                    return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                        ErrorCode::ClassPermissionDenied,
                        "You are not a member of this class",
                    )));
                }
                Err(e) => return Ok(internal_error("Failed to list assignments", &e)),
            }
        }
    };

    match storage.list_assignments(query, created_by).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list assignments", &e)),
    }
}
