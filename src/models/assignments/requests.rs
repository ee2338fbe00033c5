use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub total_points: Option<f64>,
}

/// 作业列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListQuery {
    pub class_id: Option<i64>,
}

/// 新作业（用于存储层）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub class_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub total_points: f64,
}
