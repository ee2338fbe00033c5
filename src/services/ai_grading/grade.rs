use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::AiGradingService;
use crate::errors::ClassroomError;
use crate::models::grading::requests::AiGradingRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user};

/// 模型不可用时返回给用户的提示，细节只写日志
pub const AI_UNAVAILABLE_MESSAGE: &str = "AI grading unavailable, try again";

pub async fn grade_submission(
    service: &AiGradingService,
    request: &HttpRequest,
    grading_request: AiGradingRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let Some(submission_id) = grading_request.submission_id else {
        return Ok(bad_request(ErrorCode::BadRequest, "submission_id is required"));
    };

    let grader = service.get_grader(request);
    match grader.grade_submission(&user, submission_id).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outcome,
            "AI grading completed",
        ))),
        Err(e) => Ok(grading_error_response(&e)),
    }
}

/// 评分错误到 HTTP 响应的映射
pub(crate) fn grading_error_response(err: &ClassroomError) -> HttpResponse {
    match err {
        ClassroomError::Authorization(msg) => HttpResponse::Forbidden().json(
            ApiResponse::error_empty(ErrorCode::Forbidden, msg.as_str()),
        ),
        ClassroomError::NotFound(msg) => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg.as_str()),
        ),
        e if e.is_ai_unavailable() => {
            warn!("AI grading unavailable: {}", e);
            HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::AiGradingUnavailable,
                AI_UNAVAILABLE_MESSAGE,
            ))
        }
        e => {
            error!("AI grading failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error with AI grading",
            ))
        }
    }
}
