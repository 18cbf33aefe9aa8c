use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{error, warn};

use super::{ValidarQuery, ValidarService};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::documents::entities::DocumentType;
use crate::models::payments::entities::Payment;
use crate::services::documents::verify::check_integrity;
use crate::storage::Storage;
use crate::utils::pdf::format_money;
use crate::utils::signing::verify_payment_token;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    if let Err(e) = tera.add_raw_template(
        "validar.html",
        include_str!("../../../templates/validar.html"),
    ) {
        error!("Failed to parse validation template: {}", e);
    }
    tera
});

pub async fn validate_receipt(
    service: &ValidarService,
    query: ValidarQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let id = query.id.as_deref().map(str::trim).unwrap_or_default();
    let token = query.token.as_deref().map(str::trim).unwrap_or_default();

    let Ok(payment_id) = id.parse::<i64>() else {
        return Ok(failure_page(
            StatusCode::BAD_REQUEST,
            "Solicitud incompleta",
            "El enlace de validación no contiene un folio y un token válidos.",
        ));
    };
    if token.is_empty() {
        return Ok(failure_page(
            StatusCode::BAD_REQUEST,
            "Solicitud incompleta",
            "El enlace de validación no contiene un folio y un token válidos.",
        ));
    }

    if !verify_payment_token(&AppConfig::get().validation.secret, payment_id, token) {
        warn!("Invalid validation token for payment {}", payment_id);
        return Ok(failure_page(
            StatusCode::UNAUTHORIZED,
            "Recibo no válido",
            "El token de validación no corresponde a este folio. El recibo pudo haber sido alterado.",
        ));
    }

    let storage = service.get_storage(request);
    let payment = match storage.get_payment_by_id_unscoped(payment_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            return Ok(failure_page(
                StatusCode::NOT_FOUND,
                "Recibo no encontrado",
                "No existe un pago con este folio.",
            ));
        }
        Err(e) => {
            error!("Receipt validation failed for payment {}: {}", payment_id, e);
            return Ok(failure_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "No fue posible validar el recibo en este momento.",
            ));
        }
    };

    match receipt_context(&storage, &payment).await {
        Ok(context) => Ok(render(StatusCode::OK, &context)),
        Err(e) => {
            error!("Receipt validation failed for payment {}: {}", payment_id, e);
            Ok(failure_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "No fue posible validar el recibo en este momento.",
            ))
        }
    }
}

async fn receipt_context(storage: &Arc<dyn Storage>, payment: &Payment) -> Result<Context> {
    let school = storage.get_school_by_id(payment.school_id).await?;
    let student = storage
        .get_student_by_id(payment.school_id, payment.student_id)
        .await?;
    let concept = storage
        .get_concept_by_id(payment.school_id, payment.concept_id)
        .await?;
    let integrity = check_integrity(
        storage,
        None,
        DocumentType::Receipt,
        &payment.id.to_string(),
    )
    .await?
    .map(|report| report.status.to_string())
    .unwrap_or_else(|| "unrecorded".to_string());

    let mut context = base_context();
    context.insert("valid", &true);
    context.insert("school", &school.map(|s| s.name).unwrap_or_default());
    context.insert("folio", &payment.id);
    context.insert(
        "student",
        &student.as_ref().map(|s| s.full_name()).unwrap_or_default(),
    );
    context.insert(
        "enrollment_code",
        &student.map(|s| s.enrollment_code).unwrap_or_default(),
    );
    context.insert("concept", &concept.map(|c| c.name).unwrap_or_default());
    context.insert("amount", &format_money(payment.amount));
    context.insert("method", payment.method.as_str());
    context.insert("reference", &payment.reference);
    context.insert(
        "date",
        &payment
            .paid_at
            .unwrap_or(payment.created_at)
            .format("%d/%m/%Y %H:%M")
            .to_string(),
    );
    context.insert("status", payment.status.as_str());
    context.insert("integrity", &integrity);
    Ok(context)
}

fn base_context() -> Context {
    let mut context = Context::new();
    context.insert("system_name", &AppConfig::get().app.system_name);
    context.insert(
        "checked_at",
        &chrono::Utc::now().format("%d/%m/%Y %H:%M UTC").to_string(),
    );
    context
}

fn failure_page(status: StatusCode, title: &str, message: &str) -> HttpResponse {
    let mut context = base_context();
    context.insert("valid", &false);
    context.insert("title", title);
    context.insert("message", message);
    render(status, &context)
}

fn render(status: StatusCode, context: &Context) -> HttpResponse {
    match TEMPLATES.render("validar.html", context) {
        Ok(html) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            error!("Failed to render validation page: {}", e);
            HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(context.get("title").and_then(|v| v.as_str()).unwrap_or("Error").to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_page_renders_html() {
        let response = failure_page(StatusCode::UNAUTHORIZED, "Recibo no válido", "token");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/html"));
    }
}
