use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::concepts::requests::{
    ConceptListParams, CreateConceptRequest, UpdateConceptRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ConceptService;
use crate::utils::SafeIDI64;

static CONCEPT_SERVICE: Lazy<ConceptService> = Lazy::new(ConceptService::new_lazy);

pub async fn list_concepts(
    req: HttpRequest,
    query: web::Query<ConceptListParams>,
) -> ActixResult<HttpResponse> {
    CONCEPT_SERVICE.list_concepts(query.into_inner(), &req).await
}

pub async fn create_concept(
    req: HttpRequest,
    data: web::Json<CreateConceptRequest>,
) -> ActixResult<HttpResponse> {
    CONCEPT_SERVICE.create_concept(data.into_inner(), &req).await
}

pub async fn get_concept(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONCEPT_SERVICE.get_concept(id.0, &req).await
}

pub async fn update_concept(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateConceptRequest>,
) -> ActixResult<HttpResponse> {
    CONCEPT_SERVICE
        .update_concept(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_concept(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONCEPT_SERVICE.delete_concept(id.0, &req).await
}

pub fn configure_concept_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/concepts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_concepts)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_concept)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_concept)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_concept)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_concept)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
