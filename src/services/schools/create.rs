use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::{
    ApiResponse, ErrorCode,
    schools::{entities::SchoolCreatedResponse, requests::CreateSchoolRequest},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::services::common::error_response;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_clabe, validate_email, validate_password_simple, validate_slug, validate_username,
};

pub async fn create_school(
    service: &SchoolService,
    data: CreateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "School name is required",
        )));
    }
    if let Err(msg) = validate_slug(&data.slug) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if let Some(clabe) = &data.clabe
        && let Err(msg) = validate_clabe(clabe)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 首个管理员
    let admin = match data.admin.clone() {
        Some(admin) => {
            if let Err(msg) = validate_username(&admin.username) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
            }
            if let Err(msg) = validate_email(&admin.email) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
            }
            if let Err(msg) = validate_password_simple(&admin.password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
            }
            let password = match hash_password(&admin.password) {
                Ok(hash) => hash,
                Err(e) => return Ok(error_response("Password hashing failed", &e)),
            };
            Some(CreateUserRequest {
                username: admin.username,
                email: admin.email,
                password,
                role: UserRole::Admin,
                display_name: admin.display_name,
                school_id: None,
            })
        }
        None => None,
    };

    let storage = service.get_storage(request);
    match storage.create_school(data, admin).await {
        Ok((school, admin)) => {
            info!("School {} ({}) created", school.slug, school.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SchoolCreatedResponse { school, admin },
                "School created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::SchoolAlreadyExists,
                "School slug or admin username/email already exists",
            ),
        )),
        Err(e) => Ok(error_response("School creation failed", &e)),
    }
}
