//! 业务数据模型
//!
//! 按领域划分为 entities（业务实体）、requests（请求体）、responses（响应体）。

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod grading;
pub mod submissions;
pub mod users;

pub use common::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserAlreadyExists = 2005,
    UserNotFound = 2006,

    // 班级
    ClassNotFound = 3000,
    ClassCreationFailed = 3001,
    ClassInviteCodeInvalid = 3002,
    ClassAlreadyJoined = 3003,
    ClassPermissionDenied = 3004,

    // 作业
    AssignmentNotFound = 4000,
    AssignmentCreationFailed = 4001,
    AssignmentPermissionDenied = 4002,

    // 提交与评分
    SubmissionNotFound = 5000,
    SubmissionAlreadyExists = 5001,
    SubmissionCreationFailed = 5002,
    GradeOutOfRange = 5003,
    GradeUpdateFailed = 5004,

    // AI 评分
    AiGradingUnavailable = 6000,
}
