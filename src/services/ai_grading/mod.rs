pub mod grade;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::grading::AiGrader;
use crate::models::grading::requests::AiGradingRequest;

/// 评分器在启动时构建一次，通过 app_data 共享
pub struct AiGradingService;

impl AiGradingService {
    pub(crate) fn get_grader(&self, request: &HttpRequest) -> Arc<AiGrader> {
        request
            .app_data::<web::Data<Arc<AiGrader>>>()
            .expect("AI grader not found in app data")
            .get_ref()
            .clone()
    }

    // 为提交生成 AI 评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        grading_request: AiGradingRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, grading_request).await
    }
}
