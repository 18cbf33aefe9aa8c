use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error};

use crate::config::StripeConfig;
use crate::errors::{AcademiqError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// 按 PaymentIntent 状态对付款的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Succeeded,
    Pending,
    Failed,
}

impl PaymentIntent {
    pub fn outcome(&self) -> IntentOutcome {
        match self.status.as_str() {
            "succeeded" => IntentOutcome::Succeeded,
            "canceled" => IntentOutcome::Failed,
            _ => IntentOutcome::Pending,
        }
    }
}

/// webhook 事件，只解析需要的字段
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// 金额（比索）转为 Stripe 的最小货币单位（centavos）
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
    currency: String,
}

impl StripeClient {
    /// 未配置 secret_key 时返回 None
    pub fn from_config(config: &StripeConfig) -> Result<Option<Self>> {
        if config.secret_key.is_empty() {
            return Ok(None);
        }
        Self::new(&config.secret_key, &config.api_base, &config.currency).map(Some)
    }

    pub fn new(secret_key: &str, api_base: &str, currency: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AcademiqError::payment_gateway(e.to_string()))?;
        Ok(Self {
            http,
            secret_key: secret_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            currency: currency.to_string(),
        })
    }

    /// 创建 PaymentIntent（客户端确认流程）
    pub async fn create_payment_intent(
        &self,
        amount: f64,
        description: &str,
        metadata: &[(&str, String)],
    ) -> Result<PaymentIntent> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), to_minor_units(amount).to_string()),
            ("currency".to_string(), self.currency.clone()),
            ("description".to_string(), description.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AcademiqError::payment_gateway(format!("Stripe request failed: {e}")))?;

        let intent: PaymentIntent = Self::parse_response(response).await?;
        debug!("Created Stripe payment intent {}", intent.id);
        Ok(intent)
    }

    pub async fn retrieve_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent> {
        let response = self
            .http
            .get(format!("{}/v1/payment_intents/{}", self.api_base, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AcademiqError::payment_gateway(format!("Stripe request failed: {e}")))?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AcademiqError::payment_gateway(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .map(|b| {
                    format!(
                        "{} ({})",
                        b.error.message.unwrap_or_default(),
                        b.error.kind.unwrap_or_else(|| "unknown".to_string())
                    )
                })
                .unwrap_or(body);
            error!("Stripe returned {}: {}", status, message);
            return Err(AcademiqError::payment_gateway(format!(
                "Stripe error {}: {}",
                status.as_u16(),
                message
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            AcademiqError::payment_gateway(format!("Unexpected Stripe response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn intent_json(status: &str) -> serde_json::Value {
        json!({
            "id": "pi_123",
            "object": "payment_intent",
            "status": status,
            "amount": 250000,
            "currency": "mxn",
            "client_secret": "pi_123_secret_abc",
            "metadata": {"payment_id": "5"}
        })
    }

    #[test]
    fn test_minor_units_and_outcome() {
        assert_eq!(to_minor_units(2500.0), 250000);
        assert_eq!(to_minor_units(19.99), 1999);

        let intent: PaymentIntent = serde_json::from_value(intent_json("processing")).unwrap();
        assert_eq!(intent.outcome(), IntentOutcome::Pending);
        let intent: PaymentIntent = serde_json::from_value(intent_json("succeeded")).unwrap();
        assert_eq!(intent.outcome(), IntentOutcome::Succeeded);
        let intent: PaymentIntent = serde_json::from_value(intent_json("canceled")).unwrap();
        assert_eq!(intent.outcome(), IntentOutcome::Failed);
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("authorization", "Bearer sk_test_1"))
            .and(body_string_contains("amount=250000"))
            .and(body_string_contains("currency=mxn"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(intent_json("requires_payment_method")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = StripeClient::new("sk_test_1", &server.uri(), "mxn").unwrap();
        let intent = client
            .create_payment_intent(2500.0, "Colegiatura", &[("payment_id", "5".to_string())])
            .await
            .unwrap();
        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_123_secret_abc"));
    }

    #[tokio::test]
    async fn test_gateway_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment_intents/pi_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"message": "No such payment_intent", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let client = StripeClient::new("sk_test_1", &server.uri(), "mxn").unwrap();
        let err = client
            .retrieve_payment_intent("pi_missing")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");
        assert!(err.message().contains("No such payment_intent"));
    }

    #[test]
    fn test_not_configured() {
        let config = StripeConfig::default();
        assert!(StripeClient::from_config(&config).unwrap().is_none());
    }
}
