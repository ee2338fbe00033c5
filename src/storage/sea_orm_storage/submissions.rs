//! 提交存储操作

use super::{SeaOrmStorage, map_write_error};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::Entity as Users;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    grading::entities::GradingResult,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
        responses::{SubmissionListItem, SubmissionStudent},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(student_id),
            content: Set(req.content),
            submitted_at: Set(now),
            status: Set(SubmissionStatus::Submitted.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建提交失败", "该作业已提交过"))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的提交（附带学生信息，按提交时间倒序）
    pub async fn list_submissions_impl(
        &self,
        assignment_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<SubmissionListItem>> {
        let mut select = Submissions::find().filter(Column::AssignmentId.eq(assignment_id));

        if let Some(student_id) = student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let rows = select
            .find_also_related(Users)
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(submission, user)| SubmissionListItem {
                submission: submission.into_submission(),
                student: user.map(|u| SubmissionStudent {
                    id: u.id,
                    username: u.username,
                    display_name: u.display_name,
                    email: u.email,
                }),
            })
            .collect())
    }

    /// 人工评分，只更新提供的字段
    pub async fn update_submission_impl(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let mut model = ActiveModel {
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(grade) = update.grade {
            model.grade = Set(Some(grade));
        }

        if let Some(feedback) = update.feedback {
            model.feedback = Set(Some(feedback));
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        self.apply_submission_update(submission_id, model, "更新提交失败")
            .await
    }

    /// 写入 AI 评分：只改 ai_grade、ai_feedback 与 updated_at
    pub async fn update_submission_ai_grade_impl(
        &self,
        submission_id: i64,
        result: &GradingResult,
    ) -> Result<Option<Submission>> {
        let model = ActiveModel {
            ai_grade: Set(Some(result.score)),
            ai_feedback: Set(Some(result.feedback.clone())),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        self.apply_submission_update(submission_id, model, "写入 AI 评分失败")
            .await
    }

    /// 单条语句更新，提交不存在时返回 None
    async fn apply_submission_update(
        &self,
        submission_id: i64,
        model: ActiveModel,
        context: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::update_many()
            .set(model)
            .filter(Column::Id.eq(submission_id))
            .exec(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("{context}: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(submission_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        assignments::requests::NewAssignment,
        classes::requests::NewClass,
        users::{entities::UserRole, requests::CreateUserRequest},
    };

    struct Fixture {
        storage: SeaOrmStorage,
        assignment_id: i64,
        student_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let mut ids = Vec::new();
        for (name, role) in [("teacher", UserRole::Teacher), ("student", UserRole::Student)] {
            let user = storage
                .create_user_impl(CreateUserRequest {
                    username: name.to_string(),
                    email: format!("{name}@example.com"),
                    password: "hashed".to_string(),
                    role,
                    display_name: Some(name.to_uppercase()),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let class = storage
            .create_class_impl(NewClass {
                teacher_id: ids[0],
                name: "Biology".to_string(),
                description: String::new(),
                class_code: "BIO00001".to_string(),
                join_link: "http://localhost:3000/join-class/BIO00001".to_string(),
            })
            .await
            .unwrap();
        let assignment = storage
            .create_assignment_impl(NewAssignment {
                class_id: class.id,
                created_by: ids[0],
                title: "Cells".to_string(),
                description: "Describe mitosis".to_string(),
                due_date: chrono::Utc::now(),
                total_points: 50.0,
            })
            .await
            .unwrap();

        Fixture {
            storage,
            assignment_id: assignment.id,
            student_id: ids[1],
        }
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_conflict() {
        let f = fixture().await;
        let req = || CreateSubmissionRequest {
            assignment_id: f.assignment_id,
            content: "answer".to_string(),
        };

        f.storage
            .create_submission_impl(f.student_id, req())
            .await
            .unwrap();
        let err = f
            .storage
            .create_submission_impl(f.student_id, req())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassroomError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_includes_student() {
        let f = fixture().await;
        f.storage
            .create_submission_impl(
                f.student_id,
                CreateSubmissionRequest {
                    assignment_id: f.assignment_id,
                    content: "answer".to_string(),
                },
            )
            .await
            .unwrap();

        let items = f
            .storage
            .list_submissions_impl(f.assignment_id, None)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        let student = items[0].student.as_ref().unwrap();
        assert_eq!(student.username, "student");
        assert_eq!(student.email, "student@example.com");
    }

    #[tokio::test]
    async fn test_ai_grade_leaves_human_fields() {
        let f = fixture().await;
        let submission = f
            .storage
            .create_submission_impl(
                f.student_id,
                CreateSubmissionRequest {
                    assignment_id: f.assignment_id,
                    content: "answer".to_string(),
                },
            )
            .await
            .unwrap();

        f.storage
            .update_submission_impl(
                submission.id,
                UpdateSubmissionRequest {
                    grade: Some(40.0),
                    feedback: Some("Good".to_string()),
                    status: Some(SubmissionStatus::Graded),
                },
            )
            .await
            .unwrap()
            .unwrap();

        let updated = f
            .storage
            .update_submission_ai_grade_impl(
                submission.id,
                &GradingResult {
                    score: 42.5,
                    feedback: "Clear explanation".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.ai_grade, Some(42.5));
        assert_eq!(updated.ai_feedback.as_deref(), Some("Clear explanation"));
        assert_eq!(updated.grade, Some(40.0));
        assert_eq!(updated.feedback.as_deref(), Some("Good"));
        assert_eq!(updated.status, SubmissionStatus::Graded);
        assert_eq!(updated.content, "answer");
    }

    #[tokio::test]
    async fn test_update_missing_submission_returns_none() {
        let f = fixture().await;
        let result = f
            .storage
            .update_submission_ai_grade_impl(
                9999,
                &GradingResult {
                    score: 1.0,
                    feedback: "x".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
