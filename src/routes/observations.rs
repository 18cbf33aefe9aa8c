use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::observations::requests::{CreateObservationRequest, ObservationListParams};
use crate::models::users::entities::UserRole;
use crate::services::ObservationService;
use crate::utils::SafeIDI64;

static OBSERVATION_SERVICE: Lazy<ObservationService> = Lazy::new(ObservationService::new_lazy);

pub async fn list_observations(
    req: HttpRequest,
    query: web::Query<ObservationListParams>,
) -> ActixResult<HttpResponse> {
    OBSERVATION_SERVICE
        .list_observations(query.into_inner(), &req)
        .await
}

pub async fn create_observation(
    req: HttpRequest,
    data: web::Json<CreateObservationRequest>,
) -> ActixResult<HttpResponse> {
    OBSERVATION_SERVICE
        .create_observation(data.into_inner(), &req)
        .await
}

pub async fn get_observation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    OBSERVATION_SERVICE.get_observation(id.0, &req).await
}

pub async fn delete_observation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    OBSERVATION_SERVICE.delete_observation(id.0, &req).await
}

pub fn configure_observation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/observations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::academic_roles()))
                    .route("", web::get().to(list_observations))
                    .route("", web::post().to(create_observation))
                    .route("/{id}", web::get().to(get_observation))
                    .route("/{id}", web::delete().to(delete_observation)),
            ),
    );
}
