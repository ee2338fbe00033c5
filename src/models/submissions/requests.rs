use super::entities::SubmissionStatus;
use serde::Deserialize;
use ts_rs::TS;

/// 创建提交请求（学生）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub content: String,
}

/// 提交列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListQuery {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}

/// 人工评分请求，只更新提供的字段
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct UpdateSubmissionRequest {
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub status: Option<SubmissionStatus>,
}

impl UpdateSubmissionRequest {
    pub fn is_empty(&self) -> bool {
        self.grade.is_none() && self.feedback.is_none() && self.status.is_none()
    }
}
