pub mod ai_grading;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod submissions;

pub use ai_grading::AiGradingService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use submissions::SubmissionService;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::errors::ClassroomError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 从请求扩展中取出当前用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 存储层内部错误统一返回 500
pub(crate) fn internal_error(context: &str, err: &ClassroomError) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        context,
    ))
}

/// 参数校验失败统一返回 400
pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}
