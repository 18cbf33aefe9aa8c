use super::entities::{PaymentMethod, PaymentStatus};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub concept_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
}

// 登记付款（柜台收款），金额为空时取欠款或缴费项目金额
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreatePaymentRequest {
    #[serde(alias = "alumnoId")]
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub amount: Option<f64>,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 只允许修改备注、参考号，以及取消
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct UpdatePaymentRequest {
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub status: Option<PaymentStatus>,
}

// 存储层插入输入
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub notes: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: i64,
    pub size: i64,
    pub student_id: Option<i64>,
    pub concept_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
}

// 创建 Stripe PaymentIntent（客户端确认流程）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreateIntentRequest {
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub amount: Option<f64>,
}
