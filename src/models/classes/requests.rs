use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求（来自HTTP请求，教师即当前登录用户）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub description: String,
}

// 加入班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct JoinClassRequest {
    pub class_code: String,
}

// 新班级（用于存储层，班级码与链接已生成）
#[derive(Debug, Clone)]
pub struct NewClass {
    pub teacher_id: i64,
    pub name: String,
    pub description: String,
    pub class_code: String,
    pub join_link: String,
}
