use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::StudentContext;
use super::{AiService, SYSTEM_PROMPT, ai_failure, claude_client};
use crate::models::{ApiResponse, ai::entities::RecommendationResponse};
use crate::services::common::{error_response, find_student, require_school, try_response};

pub async fn recommendations(
    service: &AiService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let client = try_response!(claude_client());
    let storage = service.get_storage(request);

    let student = try_response!(find_student(&storage, school_id, student_id).await);
    let context = match StudentContext::load(&storage, school_id, student).await {
        Ok(context) => context,
        Err(e) => return Ok(error_response("Failed to load student context", &e)),
    };

    let prompt = format!(
        "<alumno>\n{}</alumno>\n\n\
         Con base en estos datos, propone entre 3 y 5 recomendaciones pedagógicas \
         concretas para el docente y la familia. Prioriza las materias con promedio más bajo.",
        context.to_prompt_block()
    );

    match client.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(completion) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RecommendationResponse {
                student_id,
                recommendations: completion.text,
                model: completion.model,
            },
            "Recommendations generated successfully",
        ))),
        Err(e) => Ok(ai_failure(&e)),
    }
}
