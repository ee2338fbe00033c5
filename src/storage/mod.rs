use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, NewAssignment},
    },
    classes::{entities::Class, requests::NewClass, responses::ClassListItem},
    grading::entities::GradingResult,
    submissions::{
        entities::Submission,
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
        responses::SubmissionListItem,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段需已是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;

    /// 班级管理方法
    // 创建班级
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过班级码获取班级信息
    async fn get_class_by_code(&self, class_code: &str) -> Result<Option<Class>>;
    // 列出教师创建的班级
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<ClassListItem>>;
    // 列出学生加入的班级
    async fn list_student_classes(&self, student_id: i64) -> Result<Vec<ClassListItem>>;
    // 学生加入班级，重复加入返回 Conflict
    async fn join_class(&self, class_id: i64, student_id: i64) -> Result<()>;
    // 学生是否在班级中
    async fn is_class_student(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出作业，created_by 为空时不按创建者过滤
    async fn list_assignments(
        &self,
        query: AssignmentListQuery,
        created_by: Option<i64>,
    ) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交，同一学生对同一作业重复提交返回 Conflict
    async fn create_submission(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 列出某作业的提交（可按学生过滤）
    async fn list_submissions(
        &self,
        assignment_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<SubmissionListItem>>;
    // 人工评分：只更新提供的字段
    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 写入 AI 评分：只更新 ai_grade 与 ai_feedback
    async fn update_submission_ai_grade(
        &self,
        submission_id: i64,
        result: &GradingResult,
    ) -> Result<Option<Submission>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
