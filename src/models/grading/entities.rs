use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 一次评分的结果，由模型回复解析得到，写回提交的 AI 字段后即丢弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingResult {
    pub score: f64,
    pub feedback: String,
}
