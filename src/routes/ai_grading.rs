use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::grading::requests::AiGradingRequest;
use crate::services::AiGradingService;

static AI_GRADING_SERVICE: AiGradingService = AiGradingService;

pub async fn grade_submission(
    req: HttpRequest,
    grading_data: web::Json<AiGradingRequest>,
) -> ActixResult<HttpResponse> {
    AI_GRADING_SERVICE
        .grade_submission(&req, grading_data.into_inner())
        .await
}

// 配置路由
pub fn configure_ai_grading_routes(cfg: &mut web::ServiceConfig) {
    // 角色与作业归属由评分器自行检查，未授权时返回 403
    cfg.service(
        web::scope("/api/v1/ai-grading")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(grade_submission)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::testing::{GradingFixture, MockClient, grading_config};
    use crate::grading::{AiGrader, ModelClient};
    use crate::models::users::entities::User;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    fn grading_request(user: &User, submission_id: i64) -> test::TestRequest {
        let token = user.generate_access_token().unwrap();
        test::TestRequest::post()
            .uri("/api/v1/ai-grading")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(serde_json::json!({ "submission_id": submission_id }))
    }

    async fn call(
        f: &GradingFixture,
        client: &Arc<MockClient>,
        req: test::TestRequest,
    ) -> (StatusCode, serde_json::Value) {
        let model: Arc<dyn ModelClient> = client.clone();
        let grader = Arc::new(AiGrader::new(f.dyn_storage(), model, grading_config()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.dyn_storage()))
                .app_data(web::Data::new(grader))
                .configure(configure_ai_grading_routes),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_owner_grades_submission() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 91, "feedback": "Lively"}"#);

        let (status, body) = call(&f, &client, grading_request(&f.teacher, f.submission.id)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ai_grading"]["score"], 91.0);
        assert_eq!(f.reload().await.ai_grade, Some(91.0));
    }

    #[actix_web::test]
    async fn test_non_owner_gets_forbidden_without_model_call() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let (status, body) =
            call(&f, &client, grading_request(&f.other_teacher, f.submission.id)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], 1003);
        assert_eq!(client.calls(), 0);
        assert_eq!(f.reload().await.ai_grade, None);
    }

    #[actix_web::test]
    async fn test_student_gets_forbidden() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let (status, _) = call(&f, &client, grading_request(&f.student, f.submission.id)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(client.calls(), 0);
    }

    #[actix_web::test]
    async fn test_missing_submission_is_not_found() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);

        let (status, _) =
            call(&f, &client, grading_request(&f.teacher, f.submission.id + 1000)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(client.calls(), 0);
    }

    #[actix_web::test]
    async fn test_malformed_reply_is_bad_gateway() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying("Solid effort, maybe a B.");

        let (status, body) = call(&f, &client, grading_request(&f.teacher, f.submission.id)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], 6000);
        assert_eq!(body["message"], "AI grading unavailable, try again");
        assert_eq!(f.reload().await.ai_feedback, None);
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let f = GradingFixture::new().await;
        let client = MockClient::replying(r#"{"score": 10, "feedback": "x"}"#);
        let req = test::TestRequest::post()
            .uri("/api/v1/ai-grading")
            .set_json(serde_json::json!({ "submission_id": f.submission.id }));

        let (status, _) = call(&f, &client, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(client.calls(), 0);
    }
}
