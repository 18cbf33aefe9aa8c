use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::models::common::round_money;
use crate::models::payments::entities::Payment;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
    DocumentType {
        Receipt => "recibo",
        Report => "informe",
    }
}

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
    IntegrityStatus {
        Valid => "valid",
        Tampered => "tampered",
        Missing => "missing",
    }
}

// 文档哈希记录，同一 (类型, 文档ID) 以最新一条为准
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentHash {
    pub id: i64,
    pub school_id: i64,
    pub document_type: DocumentType,
    pub document_id: String,
    pub file_path: String,
    pub sha256: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 完整性校验结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct IntegrityReport {
    pub document_type: DocumentType,
    pub document_id: String,
    pub status: IntegrityStatus,
    pub expected_sha256: String,
    pub actual_sha256: Option<String>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

// 生成的 PDF 文档
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct GeneratedDocument {
    pub document_type: DocumentType,
    pub document_id: String,
    pub url: String,
    pub sha256: String,
}

// 收入报表中的一行（按项目或按支付方式汇总）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct IncomeLine {
    pub label: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct IncomeReport {
    pub date_from: chrono::NaiveDate,
    pub date_to: chrono::NaiveDate,
    pub by_concept: Vec<IncomeLine>,
    pub by_method: Vec<IncomeLine>,
    pub payment_count: i64,
    pub total: f64,
}

impl IncomeReport {
    /// 按项目名称与支付方式分组汇总，各组按金额降序
    pub fn from_payments(
        date_from: chrono::NaiveDate,
        date_to: chrono::NaiveDate,
        payments: &[Payment],
        concept_names: &HashMap<i64, String>,
    ) -> Self {
        let mut by_concept: BTreeMap<String, IncomeLine> = BTreeMap::new();
        let mut by_method: BTreeMap<String, IncomeLine> = BTreeMap::new();
        let mut total = 0.0;

        for payment in payments {
            let concept = concept_names
                .get(&payment.concept_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", payment.concept_id));
            for (map, label) in [
                (&mut by_concept, concept),
                (&mut by_method, payment.method.to_string()),
            ] {
                let line = map.entry(label.clone()).or_insert(IncomeLine {
                    label,
                    count: 0,
                    total: 0.0,
                });
                line.count += 1;
                line.total = round_money(line.total + payment.amount);
            }
            total += payment.amount;
        }

        let sorted = |map: BTreeMap<String, IncomeLine>| {
            let mut lines: Vec<IncomeLine> = map.into_values().collect();
            lines.sort_by(|a, b| b.total.total_cmp(&a.total));
            lines
        };

        Self {
            date_from,
            date_to,
            by_concept: sorted(by_concept),
            by_method: sorted(by_method),
            payment_count: payments.len() as i64,
            total: round_money(total),
        }
    }
}

// 收入报表 + 生成的 PDF
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct IncomeReportResponse {
    pub report: IncomeReport,
    pub document: GeneratedDocument,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::entities::{PaymentMethod, PaymentStatus};

    fn payment(id: i64, concept_id: i64, amount: f64, method: PaymentMethod) -> Payment {
        let now = chrono::Utc::now();
        Payment {
            id,
            school_id: 1,
            student_id: 1,
            concept_id,
            debt_id: None,
            amount,
            method,
            status: PaymentStatus::Paid,
            reference: None,
            stripe_payment_intent_id: None,
            receipt_path: None,
            notes: None,
            paid_at: Some(now),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_income_grouping() {
        let names = HashMap::from([(1, "Colegiatura".to_string()), (2, "Inscripción".to_string())]);
        let payments = vec![
            payment(1, 1, 2500.0, PaymentMethod::Spei),
            payment(2, 1, 2500.0, PaymentMethod::Cash),
            payment(3, 2, 800.10, PaymentMethod::Cash),
            payment(4, 9, 100.0, PaymentMethod::Card),
        ];
        let day = chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let report = IncomeReport::from_payments(day, day, &payments, &names);

        assert_eq!(report.payment_count, 4);
        assert_eq!(report.total, 5900.1);
        assert_eq!(report.by_concept[0].label, "Colegiatura");
        assert_eq!(report.by_concept[0].count, 2);
        assert_eq!(report.by_concept[0].total, 5000.0);
        assert!(report.by_concept.iter().any(|l| l.label == "#9"));

        let cash = report.by_method.iter().find(|l| l.label == "efectivo").unwrap();
        assert_eq!(cash.count, 2);
        assert_eq!(cash.total, 3300.1);
    }
}
