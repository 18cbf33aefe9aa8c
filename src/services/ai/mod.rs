//! AI 助手（Anthropic Claude）与学业风险评估

pub mod assistant;
pub mod context;
pub mod recommendations;
pub mod risk;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::config::AppConfig;
use crate::errors::AcademiqError;
use crate::integrations::ClaudeClient;
use crate::models::{
    ApiResponse, ErrorCode,
    ai::requests::{AssistantRequest, RiskParams},
};
use crate::services::common::{define_service, error_response};

define_service!(AiService);

impl AiService {
    pub async fn assistant(
        &self,
        data: AssistantRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assistant::assistant(self, data, request).await
    }

    pub async fn recommendations(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        recommendations::recommendations(self, student_id, request).await
    }

    pub async fn risk(
        &self,
        student_id: i64,
        params: RiskParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        risk::risk(self, student_id, params, request).await
    }
}

const SYSTEM_PROMPT: &str = "Eres el asistente académico de una escuela en México. \
Respondes en español, de forma breve y concreta, a docentes y personal administrativo. \
Usa solo los datos del alumno que se te proporcionan y no inventes calificaciones ni montos.";

pub(crate) fn claude_client() -> Result<ClaudeClient, HttpResponse> {
    match ClaudeClient::from_config(&AppConfig::get().ai) {
        Ok(Some(client)) => Ok(client),
        Ok(None) => {
            error!("AI request rejected: ai.api_key is not configured");
            Err(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AiNotConfigured,
                "AI assistant is not configured",
            )))
        }
        Err(e) => Err(ai_failure(&e)),
    }
}

pub(crate) fn ai_failure(err: &AcademiqError) -> HttpResponse {
    error!("AI request failed: {}", err);
    error_response("AI request failed", err)
}
