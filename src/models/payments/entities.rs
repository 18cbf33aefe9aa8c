use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
    PaymentMethod {
        Cash => "efectivo",
        Transfer => "transferencia",
        Spei => "spei",
        Card => "tarjeta",
    }
}

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
    PaymentStatus {
        Pending => "pendiente",
        Paid => "pagado",
        Cancelled => "cancelado",
    }
}

// 付款记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    /// 收据的公开路径（/recibos/recibo-{id}.pdf）
    pub receipt_path: Option<String>,
    pub notes: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 生成收据后的返回
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct ReceiptResponse {
    pub payment_id: i64,
    pub receipt_url: String,
    pub sha256: String,
    pub validation_url: String,
}

// 付款 + 收据（收据生成失败时 receipt 为空，付款本身仍然有效）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentWithReceipt {
    pub payment: Payment,
    pub receipt: Option<ReceiptResponse>,
}

// 创建 PaymentIntent 的返回，client_secret 交给前端完成支付
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CardIntentResponse {
    pub payment: Payment,
    pub payment_intent_id: String,
    pub client_secret: Option<String>,
}

// 服务端确认的结果：intent_status 为 Stripe 侧状态
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CardConfirmation {
    pub intent_status: String,
    pub payment: Payment,
    pub receipt: Option<ReceiptResponse>,
}
