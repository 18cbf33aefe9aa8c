use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{
    ApiResponse,
    common::round_money,
    debts::entities::{Debt, DebtStatus},
    payments::entities::{Payment, PaymentStatus},
    students::entities::{Student, StudentStatement},
};
use crate::services::common::{error_response, find_student, require_school, try_response};

pub async fn get_statement(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_response!(require_school(request));
    let storage = service.get_storage(request);

    let student = try_response!(find_student(&storage, school_id, id).await);

    let debts = match storage.list_student_debts(school_id, id).await {
        Ok(debts) => debts,
        Err(e) => return Ok(error_response("Failed to load debts", &e)),
    };
    let payments = match storage.list_student_payments(school_id, id).await {
        Ok(payments) => payments,
        Err(e) => return Ok(error_response("Failed to load payments", &e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_statement(student, debts, payments),
        "Statement retrieved successfully",
    )))
}

pub(crate) fn build_statement(
    student: Student,
    debts: Vec<Debt>,
    payments: Vec<Payment>,
) -> StudentStatement {
    let total_due = debts
        .iter()
        .filter(|d| d.status.is_outstanding())
        .map(|d| d.amount)
        .sum::<f64>();
    let total_paid = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum::<f64>();
    let overdue_count = debts
        .iter()
        .filter(|d| d.status == DebtStatus::Overdue)
        .count() as i64;

    StudentStatement {
        student,
        debts,
        payments,
        total_due: round_money(total_due),
        total_paid: round_money(total_paid),
        overdue_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::EnrollmentStatus;
    use crate::models::payments::entities::PaymentMethod;
    use chrono::{NaiveDate, Utc};

    fn debt(id: i64, amount: f64, status: DebtStatus) -> Debt {
        let now = Utc::now();
        Debt {
            id,
            school_id: 1,
            student_id: 1,
            concept_id: 1,
            amount,
            due_date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            status,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(id: i64, amount: f64, status: PaymentStatus) -> Payment {
        let now = Utc::now();
        Payment {
            id,
            school_id: 1,
            student_id: 1,
            concept_id: 1,
            debt_id: None,
            amount,
            method: PaymentMethod::Cash,
            status,
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
    fn test_statement_totals() {
        let now = Utc::now();
        let student = Student {
            id: 1,
            school_id: 1,
            enrollment_code: "A-001".into(),
            first_name: "Ana".into(),
            last_name: "López".into(),
            group_id: None,
            guardian_name: None,
            guardian_email: None,
            guardian_phone: None,
            status: EnrollmentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let statement = build_statement(
            student,
            vec![
                debt(1, 2500.0, DebtStatus::Pending),
                debt(2, 1200.5, DebtStatus::Overdue),
                debt(3, 900.0, DebtStatus::Paid),
            ],
            vec![
                payment(1, 900.0, PaymentStatus::Paid),
                payment(2, 300.0, PaymentStatus::Cancelled),
            ],
        );
        assert_eq!(statement.total_due, 3700.5);
        assert_eq!(statement.total_paid, 900.0);
        assert_eq!(statement.overdue_count, 1);
    }
}
