use serde::Serialize;
use ts_rs::TS;

use super::entities::GradingResult;
use crate::models::submissions::entities::Submission;

/// AI 评分响应：更新后的提交与本次评分结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AiGradingResponse {
    pub submission: Submission,
    pub ai_grading: GradingResult,
}
