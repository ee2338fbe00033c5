use super::entities::Class;
use serde::Serialize;
use ts_rs::TS;

// 班级列表项（附带学生人数）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListItem {
    pub class: Class,
    pub student_count: i64,
}

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassListItem>,
}
