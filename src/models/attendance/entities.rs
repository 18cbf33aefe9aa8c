use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    AttendanceStatus {
        Present => "presente",
        Absent => "ausente",
        Late => "retardo",
        Excused => "justificado",
    }
}

// 考勤记录（学生 + 日期唯一）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub group_id: Option<i64>,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考勤汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    /// 出勤率（百分比），无记录时为空
    pub attendance_rate: Option<f64>,
}

impl AttendanceSummary {
    /// 按状态计数并计算出勤率
    ///
    /// 迟到与已请假计为出勤，只有缺勤拉低出勤率。
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        if summary.total > 0 {
            let attended = (summary.total - summary.absent) as f64;
            let rate = attended * 100.0 / summary.total as f64;
            summary.attendance_rate = Some((rate * 100.0).round() / 100.0);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_late_and_excused_as_attended() {
        let summary = AttendanceSummary::from_statuses([
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Excused,
            AttendanceStatus::Absent,
        ]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.attendance_rate, Some(75.0));
    }

    #[test]
    fn test_summary_without_records_has_no_rate() {
        let summary = AttendanceSummary::from_statuses(Vec::new());
        assert_eq!(summary.total, 0);
        assert!(summary.attendance_rate.is_none());
    }
}
