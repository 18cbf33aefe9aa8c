use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::payments::entities::Payment;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
    SpeiStatus {
        Pending => "pendiente",
        Paid => "pagado",
        Verified => "verificado",
        Expired => "caducado",
    }
}

// SPEI 待付款参考号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct SpeiReference {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub concept_id: i64,
    pub debt_id: Option<i64>,
    pub reference: String,
    pub amount: f64,
    pub status: SpeiStatus,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub payment_id: Option<i64>,
    pub tracking_key: Option<String>,
    // 人工取消时间；自然过期为空
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 生成参考号的返回：付款人转账所需的信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct SpeiInstructions {
    pub reference: SpeiReference,
    pub beneficiary: String,
    pub clabe: Option<String>,
}

// 对账/人工确认成功后的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct SpeiSettlement {
    pub reference: SpeiReference,
    pub payment: Payment,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/spei.ts")]
pub struct ExpireReferencesResponse {
    pub expired: i64,
}
