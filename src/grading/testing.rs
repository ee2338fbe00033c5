//! 评分相关测试共用的模型替身与数据

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::client::{CompletionRequest, ModelClient};
use crate::config::AiGradingConfig;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    assignments::{entities::Assignment, requests::NewAssignment},
    classes::requests::NewClass,
    submissions::{entities::Submission, requests::CreateSubmissionRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

/// 按顺序返回预设回复，并记录调用次数
pub(crate) struct MockClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockClient {
    pub(crate) fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub(crate) fn replying(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelClient for MockClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClassroomError::upstream("no reply queued")))
    }
}

pub(crate) fn grading_config() -> AiGradingConfig {
    AiGradingConfig {
        api_base: "http://localhost".to_string(),
        api_key: String::new(),
        model: "gpt-4".to_string(),
        temperature: 0.7,
        max_tokens: 1000,
        timeout_secs: 60,
        max_retries: 1,
    }
}

/// 一位教师布置的作业（总分 100）及一名学生的提交，另有一位无关教师
pub(crate) struct GradingFixture {
    pub storage: Arc<SeaOrmStorage>,
    pub teacher: User,
    pub other_teacher: User,
    pub student: User,
    pub assignment: Assignment,
    pub submission: Submission,
}

impl GradingFixture {
    pub(crate) async fn new() -> Self {
        let storage = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let other_teacher = create_user(&storage, "other", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;

        let class = storage
            .create_class(NewClass {
                teacher_id: teacher.id,
                name: "English".to_string(),
                description: String::new(),
                class_code: "ENG00001".to_string(),
                join_link: "http://localhost:3000/join-class/ENG00001".to_string(),
            })
            .await
            .unwrap();
        storage.join_class(class.id, student.id).await.unwrap();

        let assignment = storage
            .create_assignment(NewAssignment {
                class_id: class.id,
                created_by: teacher.id,
                title: "Essay".to_string(),
                description: "Write about your summer".to_string(),
                due_date: chrono::Utc::now(),
                total_points: 100.0,
            })
            .await
            .unwrap();
        let submission = storage
            .create_submission(
                student.id,
                CreateSubmissionRequest {
                    assignment_id: assignment.id,
                    content: "My summer was great.".to_string(),
                },
            )
            .await
            .unwrap();

        Self {
            storage,
            teacher,
            other_teacher,
            student,
            assignment,
            submission,
        }
    }

    pub(crate) fn dyn_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    /// 重新读取提交
    pub(crate) async fn reload(&self) -> Submission {
        self.storage
            .get_submission_by_id(self.submission.id)
            .await
            .unwrap()
            .unwrap()
    }
}

async fn create_user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hashed".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}
