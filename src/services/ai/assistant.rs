use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::StudentContext;
use super::{AiService, SYSTEM_PROMPT, ai_failure, claude_client};
use crate::models::{
    ApiResponse, ErrorCode,
    ai::{entities::AssistantResponse, requests::AssistantRequest},
};
use crate::services::common::{error_response, find_student, require_school, try_response};

const MAX_PROMPT_CHARS: usize = 4000;

pub async fn assistant(
    service: &AiService,
    data: AssistantRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));

    let question = data.prompt.trim();
    if question.is_empty() || question.chars().count() > MAX_PROMPT_CHARS {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Prompt must be between 1 and {MAX_PROMPT_CHARS} characters"),
        )));
    }

    let client = try_response!(claude_client());
    let storage = service.get_storage(request);

    let prompt = match data.student_id {
        Some(student_id) => {
            let student = try_response!(find_student(&storage, school_id, student_id).await);
            let context = match StudentContext::load(&storage, school_id, student).await {
                Ok(context) => context,
                Err(e) => return Ok(error_response("Failed to load student context", &e)),
            };
            format!(
                "<alumno>\n{}</alumno>\n\n{}",
                context.to_prompt_block(),
                question
            )
        }
        None => question.to_string(),
    };

    match client.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(completion) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssistantResponse {
                answer: completion.text,
                model: completion.model,
            },
            "Assistant answered successfully",
        ))),
        Err(e) => Ok(ai_failure(&e)),
    }
}
