//! 后台定时任务：过期 SPEI 参考号、逾期欠款

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::storage::Storage;

/// 单次清理的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired_references: u64,
    pub overdue_debts: u64,
}

/// 对全部学校执行一次清理
pub async fn run_sweep(storage: &Arc<dyn Storage>) -> Result<SweepReport> {
    let now = chrono::Utc::now();
    let expired_references = storage.expire_spei_references(None, now).await?;
    let overdue_debts = storage.mark_overdue_debts(None, now.date_naive()).await?;
    Ok(SweepReport {
        expired_references,
        overdue_debts,
    })
}

/// 启动周期任务；失败只记录日志，下一个周期重试
pub fn spawn_sweeper(storage: Arc<dyn Storage>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));
    warn!("Background sweep scheduled every {}s", period.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match run_sweep(&storage).await {
                Ok(report) if report != SweepReport::default() => info!(
                    "Sweep: {} SPEI references expired, {} debts overdue",
                    report.expired_references, report.overdue_debts
                ),
                Ok(_) => {}
                Err(e) => error!("Background sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::debts::requests::CreateDebtRequest;
    use crate::storage::sea_orm_storage::test_support::seeded;

    #[tokio::test]
    async fn test_sweep_marks_past_due_debts() {
        let db = seeded().await;
        let storage = db.dyn_storage();
        storage
            .create_debt(
                db.school.id,
                CreateDebtRequest {
                    student_id: db.student.id,
                    concept_id: db.concept.id,
                    amount: None,
                    due_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
                },
                2500.0,
            )
            .await
            .unwrap();

        let report = run_sweep(&storage).await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                expired_references: 0,
                overdue_debts: 1,
            }
        );
        assert_eq!(run_sweep(&storage).await.unwrap(), SweepReport::default());
    }
}
