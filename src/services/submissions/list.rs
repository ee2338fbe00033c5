use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_owned_assignment};
use crate::models::submissions::{requests::SubmissionListQuery, responses::SubmissionListResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let Some(assignment_id) = query.assignment_id else {
        return Ok(bad_request(ErrorCode::BadRequest, "assignment_id is required"));
    };

    if let Err(response) = load_owned_assignment(&storage, assignment_id, user.id).await {
        return Ok(response);
    }

    match storage
        .list_submissions(assignment_id, query.student_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list submissions", &e)),
    }
}
