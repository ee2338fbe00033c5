use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ClassService;
use crate::errors::ClassroomError;
use crate::models::classes::requests::{CreateClassRequest, NewClass};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{validate_required_text, validate_title};

/// 班级码长度
const CLASS_CODE_LEN: usize = 8;
/// 班级码冲突时的最大尝试次数
const MAX_CODE_ATTEMPTS: usize = 5;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);
    let config = service.get_config();

    if let Err(msg) = validate_title("Class name", &class_data.name) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_required_text("Class description", &class_data.description) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    for _ in 0..MAX_CODE_ATTEMPTS {
        let class_code = generate_random_code(CLASS_CODE_LEN);
        let new_class = NewClass {
            teacher_id: user.id,
            name: class_data.name.trim().to_string(),
            description: class_data.description.trim().to_string(),
            join_link: join_link(&config.app.public_url, &class_code),
            class_code,
        };

        match storage.create_class(new_class).await {
            Ok(class) => {
                info!("Class {} created by {}", class.id, user.id);
                return Ok(HttpResponse::Created()
                    .json(ApiResponse::success(class, "Class created successfully")));
            }
            Err(ClassroomError::Conflict(_)) => {
                warn!("Class code collision, regenerating");
            }
            Err(e) => return Ok(internal_error("Class creation failed", &e)),
        }
    }

    Ok(
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassCreationFailed,
            "Unable to allocate a unique class code",
        )),
    )
}

/// 加入链接：{public_url}/join-class/{code}
fn join_link(public_url: &str, class_code: &str) -> String {
    format!("{}/join-class/{}", public_url.trim_end_matches('/'), class_code)
}
