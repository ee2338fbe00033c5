use serde::Deserialize;
use ts_rs::TS;

/// AI 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AiGradingRequest {
    pub submission_id: Option<i64>,
}
