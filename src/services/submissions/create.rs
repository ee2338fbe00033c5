use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::ClassroomError;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};
use crate::utils::validate::validate_required_text;

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_data: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required_text("Content", &submission_data.content) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let assignment = match storage
        .get_assignment_by_id(submission_data.assignment_id)
        .await
    {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Ok(internal_error("Submission failed", &e)),
    };

    // 必须是该班级的学生
    match storage.is_class_student(assignment.class_id, user.id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You are not a member of this class",
            )));
        }
        Err(e) => return Ok(internal_error("Submission failed", &e)),
    }

    match storage.create_submission(user.id, submission_data).await {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} (submission {})",
                user.id, assignment.id, submission.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission created successfully",
            )))
        }
        Err(ClassroomError::Conflict(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyExists,
                "You have already submitted this assignment",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::SubmissionCreationFailed,
                format!("Submission failed: {e}"),
            )),
        ),
    }
}
