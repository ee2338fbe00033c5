use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::entities::DEFAULT_TOTAL_POINTS;
use crate::models::assignments::requests::{CreateAssignmentRequest, NewAssignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};
use crate::utils::validate::{validate_required_text, validate_title, validate_total_points};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    // 字段校验
    if let Err(msg) = validate_title("Title", &assignment_data.title) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required_text("Description", &assignment_data.description) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let total_points = assignment_data.total_points.unwrap_or(DEFAULT_TOTAL_POINTS);
    if let Err(msg) = validate_total_points(total_points) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    // 只能在自己的班级里布置作业
    match storage.get_class_by_id(assignment_data.class_id).await {
        Ok(Some(class)) if class.teacher_id == user.id => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You can only create assignments in your own classes",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(internal_error("Assignment creation failed", &e)),
    }

    let new_assignment = NewAssignment {
        class_id: assignment_data.class_id,
        created_by: user.id,
        title: assignment_data.title.trim().to_string(),
        description: assignment_data.description,
        due_date: assignment_data.due_date,
        total_points,
    };

    match storage.create_assignment(new_assignment).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in class {} by {}",
                assignment.id, assignment.class_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AssignmentCreationFailed,
                format!("Assignment creation failed: {e}"),
            )),
        ),
    }
}
