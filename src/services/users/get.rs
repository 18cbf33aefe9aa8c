use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, find_school_user};
use crate::models::ApiResponse;
use crate::services::common::{require_school, try_response};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let user = try_response!(find_school_user(&storage, school_id, user_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User retrieved successfully")))
}
