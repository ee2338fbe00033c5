pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::entities::Assignment;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 学生提交作业
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        submission_data: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, submission_data).await
    }

    // 教师查看作业的提交列表
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    // 教师人工评分
    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        update_data: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, submission_id, update_data).await
    }
}

/// 获取作业并确认由当前教师创建
pub(crate) async fn load_owned_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    teacher_id: i64,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) if assignment.created_by == teacher_id => Ok(assignment),
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AssignmentPermissionDenied,
            "You do not have permission to access this assignment",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Err(internal_error("Failed to load assignment", &e)),
    }
}
