use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_owned_assignment};
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};

pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    update_data: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    if update_data.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Nothing to update"));
    }

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Ok(submission_not_found()),
        Err(e) => return Ok(internal_error("Grade update failed", &e)),
    };

    let assignment =
        match load_owned_assignment(&storage, submission.assignment_id, user.id).await {
            Ok(assignment) => assignment,
            Err(response) => return Ok(response),
        };

    if let Some(grade) = update_data.grade
        && !assignment.accepts_score(grade)
    {
        return Ok(bad_request(
            ErrorCode::GradeOutOfRange,
            format!("Grade must be between 0 and {}", assignment.total_points),
        ));
    }

    match storage.update_submission(submission_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Submission {} graded by {}", submission_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Submission updated successfully",
            )))
        }
        Ok(None) => Ok(submission_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::GradeUpdateFailed,
                format!("Grade update failed: {e}"),
            )),
        ),
    }
}

fn submission_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        "Submission not found",
    ))
}
