//! AI 评分适配器
//!
//! 把一次“请 AI 给这份提交打分”的请求转换为：权限检查 → 构建提示词 →
//! 调用模型 → 解析回复 → 写回提交的 `ai_grade` / `ai_feedback`。
//! 权限与存在性检查都在调用模型之前完成，失败时提交保持原样。
//! 同一提交的并发评分不加锁，后写入者生效。

pub mod client;
pub mod extract;
pub mod prompt;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AiGradingConfig;
use crate::errors::{ClassroomError, Result};
use crate::models::{grading::responses::AiGradingResponse, users::entities::User};
use crate::storage::Storage;

pub use client::{CompletionRequest, ModelClient, OpenAiClient};

pub struct AiGrader {
    storage: Arc<dyn Storage>,
    client: Arc<dyn ModelClient>,
    config: AiGradingConfig,
}

impl AiGrader {
    pub fn new(
        storage: Arc<dyn Storage>,
        client: Arc<dyn ModelClient>,
        config: AiGradingConfig,
    ) -> Self {
        Self {
            storage,
            client,
            config,
        }
    }

    /// 为提交生成 AI 评分并保存
    pub async fn grade_submission(
        &self,
        caller: &User,
        submission_id: i64,
    ) -> Result<AiGradingResponse> {
        if !caller.is_teacher() {
            return Err(ClassroomError::authorization("只有教师可以使用 AI 评分"));
        }

        let submission = self
            .storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| ClassroomError::not_found(format!("提交 {submission_id} 不存在")))?;

        let assignment = self
            .storage
            .get_assignment_by_id(submission.assignment_id)
            .await?
            .ok_or_else(|| {
                ClassroomError::not_found(format!("作业 {} 不存在", submission.assignment_id))
            })?;

        if assignment.created_by != caller.id {
            return Err(ClassroomError::authorization("无权评阅该作业的提交"));
        }

        let prompt = prompt::build_grading_prompt(&assignment, &submission);
        debug!(
            "AI 评分提示词已生成: submission_id={}, prompt_len={}",
            submission_id,
            prompt.len()
        );

        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: prompt::SYSTEM_ROLE.to_string(),
            user: prompt,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let reply = self.client.complete(&request).await.inspect_err(|e| {
            warn!("AI 评分调用模型失败: submission_id={}, {}", submission_id, e);
        })?;

        let grading = extract::parse_grading_reply(&reply, assignment.total_points)
            .inspect_err(|e| {
                warn!(
                    "AI 评分回复无法解析: submission_id={}, {}, reply={:?}",
                    submission_id, e, reply
                );
            })?;

        let updated = self
            .storage
            .update_submission_ai_grade(submission_id, &grading)
            .await?
            .ok_or_else(|| ClassroomError::not_found(format!("提交 {submission_id} 已被删除")))?;

        info!(
            "AI 评分完成: submission_id={}, score={}",
            submission_id, grading.score
        );

        Ok(AiGradingResponse {
            submission: updated,
            ai_grading: grading,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::{GradingFixture, MockClient, grading_config};

    fn grader(f: &GradingFixture, client: &Arc<MockClient>) -> AiGrader {
        let client: Arc<dyn ModelClient> = client.clone();
        AiGrader::new(f.dyn_storage(), client, grading_config())
    }

    #[tokio::test]
    async fn test_well_formed_reply_is_saved() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 88, "feedback": "Vivid details"}"#);

        let outcome = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap();

        assert_eq!(outcome.ai_grading.score, 88.0);
        assert_eq!(outcome.ai_grading.feedback, "Vivid details");
        assert_eq!(outcome.submission.ai_grade, Some(88.0));
        assert_eq!(outcome.submission.ai_feedback.as_deref(), Some("Vivid details"));

        let stored = f.reload().await;
        assert_eq!(stored.ai_grade, Some(88.0));
        assert_eq!(stored.ai_feedback.as_deref(), Some("Vivid details"));
        assert_eq!(stored.grade, None);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_settings() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 50, "feedback": "ok"}"#);

        grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap();

        let request = client.last_request().unwrap();
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.system, prompt::SYSTEM_ROLE);
        assert_eq!(request.max_tokens, 1000);
        assert!(request.user.contains("Assignment: Essay"));
        assert!(request.user.contains("My summer was great."));
    }

    #[tokio::test]
    async fn test_reply_without_object_is_malformed() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying("I'd give it a solid B+.");

        let err = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::MalformedResponse(_)));
        let stored = f.reload().await;
        assert_eq!(stored.ai_grade, None);
        assert_eq!(stored.ai_feedback, None);
    }

    #[tokio::test]
    async fn test_trailing_comma_is_malformed() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 70, "feedback": "Nice",}"#);

        let err = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::MalformedResponse(_)));
        assert_eq!(f.reload().await.ai_grade, None);
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_malformed() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 120, "feedback": "Amazing"}"#);

        let err = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::MalformedResponse(_)));
        assert_eq!(f.reload().await.ai_grade, None);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_submission() {
        let f = GradingFixture::new().await;
        let client = MockClient::new(vec![Err(ClassroomError::upstream("503"))]);

        let err = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::Upstream(_)));
        assert!(err.is_ai_unavailable());
        assert_eq!(f.reload().await.ai_feedback, None);
    }

    #[tokio::test]
    async fn test_non_owner_is_rejected_without_model_call() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let err = grader(&f, &client)
            .grade_submission(&f.other_teacher, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::Authorization(_)));
        assert_eq!(client.calls(), 0);
        assert_eq!(f.reload().await.ai_grade, None);
    }

    #[tokio::test]
    async fn test_student_is_rejected_without_model_call() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let err = grader(&f, &client)
            .grade_submission(&f.student, f.submission.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::Authorization(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_submission_is_not_found() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let err = grader(&f, &client)
            .grade_submission(&f.teacher, f.submission.id + 1000)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassroomError::NotFound(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_grading_wins() {
        let f = GradingFixture::new().await;
        let client = MockClient::new(vec![
            Ok(r#"{"score": 60, "feedback": "First pass"}"#.to_string()),
            Ok(r#"{"score": 75, "feedback": "Second pass"}"#.to_string()),
        ]);
        let grader = grader(&f, &client);

        grader
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap();
        grader
            .grade_submission(&f.teacher, f.submission.id)
            .await
            .unwrap();

        let stored = f.reload().await;
        assert_eq!(stored.ai_grade, Some(75.0));
        assert_eq!(stored.ai_feedback.as_deref(), Some("Second pass"));
        assert_eq!(client.calls(), 2);
    }
}
