//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod concepts;
mod dashboard;
mod debts;
mod documents;
mod grades;
mod groups;
mod observations;
mod payments;
mod schools;
mod spei;
mod students;
mod subjects;
mod teachers;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{AcademiqError, Result};
use crate::models::{PaginatedResponse, PaginationInfo};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;
use ts_rs::TS;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url, &config.database).await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademiqError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademiqError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AcademiqError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademiqError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 分页查询并转换为业务模型
    pub(crate) async fn paginate<E, T, F>(
        &self,
        select: Select<E>,
        page: i64,
        size: i64,
        what: &str,
        convert: F,
    ) -> Result<PaginatedResponse<T>>
    where
        E: EntityTrait,
        E::Model: Sync,
        T: TS,
        F: Fn(E::Model) -> T,
    {
        let page = page.max(1) as u64;
        let size = size.clamp(1, 100) as u64;

        let paginator = select.paginate(&self.db, size);
        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询{what}总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademiqError::database_operation(format!("查询{what}列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: models.into_iter().map(convert).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: counts.number_of_items as i64,
                total_pages: counts.number_of_pages as i64,
            },
        })
    }
}

// Storage trait 实现
use crate::models::{
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::{AttendanceListQuery, AttendanceUpsert, UpdateAttendanceRequest},
    },
    concepts::{
        entities::PaymentConcept,
        requests::{ConceptListQuery, CreateConceptRequest, UpdateConceptRequest},
    },
    dashboard::entities::DashboardSummary,
    debts::{
        entities::Debt,
        requests::{CreateDebtRequest, DebtListQuery, UpdateDebtRequest},
    },
    documents::{
        entities::{DocumentHash, DocumentType},
        requests::NewDocumentHash,
    },
    grades::{
        entities::Grade,
        requests::{CreateGradeRequest, GradeListQuery, UpdateGradeRequest},
    },
    groups::{
        entities::Group,
        requests::{CreateGroupRequest, GroupListQuery, UpdateGroupRequest},
    },
    observations::{
        entities::{Observation, ObservationCategory},
        requests::{CreateObservationRequest, ObservationListQuery},
    },
    payments::{
        entities::Payment,
        requests::{NewPayment, PaymentListQuery, UpdatePaymentRequest},
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
    spei::{
        entities::{SpeiReference, SpeiStatus},
        requests::{NewSpeiReference, SpeiListQuery, SpeiSettlementInput},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校管理方法
    async fn create_school(&self, school: CreateSchoolRequest, admin: Option<CreateUserRequest>) -> Result<(School, Option<User>)> {
        self.create_school_impl(school, admin).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn list_schools_with_pagination(&self, query: SchoolListQuery) -> Result<PaginatedResponse<School>> {
        self.list_schools_with_pagination_impl(query).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }


    // 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }


    // 学生管理方法
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(school_id, req).await
    }

    async fn get_student_by_id(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(school_id, id).await
    }

    async fn list_students_with_pagination(&self, school_id: i64, query: StudentListQuery) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(school_id, query).await
    }

    async fn list_students_by_group(&self, school_id: i64, group_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_group_impl(school_id, group_id).await
    }

    async fn update_student(&self, school_id: i64, id: i64, update: UpdateStudentRequest) -> Result<Option<Student>> {
        self.update_student_impl(school_id, id, update).await
    }

    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_student_impl(school_id, id).await
    }


    // 教师管理方法
    async fn create_teacher(&self, school_id: i64, req: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(school_id, req).await
    }

    async fn get_teacher_by_id(&self, school_id: i64, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(school_id, id).await
    }

    async fn list_teachers_with_pagination(&self, school_id: i64, query: TeacherListQuery) -> Result<PaginatedResponse<Teacher>> {
        self.list_teachers_with_pagination_impl(school_id, query).await
    }

    async fn update_teacher(&self, school_id: i64, id: i64, update: UpdateTeacherRequest) -> Result<Option<Teacher>> {
        self.update_teacher_impl(school_id, id, update).await
    }

    async fn delete_teacher(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_teacher_impl(school_id, id).await
    }


    // 班级管理方法
    async fn create_group(&self, school_id: i64, req: CreateGroupRequest) -> Result<Group> {
        self.create_group_impl(school_id, req).await
    }

    async fn get_group_by_id(&self, school_id: i64, id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(school_id, id).await
    }

    async fn list_groups_with_pagination(&self, school_id: i64, query: GroupListQuery) -> Result<PaginatedResponse<Group>> {
        self.list_groups_with_pagination_impl(school_id, query).await
    }

    async fn update_group(&self, school_id: i64, id: i64, update: UpdateGroupRequest) -> Result<Option<Group>> {
        self.update_group_impl(school_id, id, update).await
    }

    async fn delete_group(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_group_impl(school_id, id).await
    }


    // 科目管理方法
    async fn create_subject(&self, school_id: i64, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(school_id, req).await
    }

    async fn get_subject_by_id(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(school_id, id).await
    }

    async fn list_subjects_with_pagination(&self, school_id: i64, query: SubjectListQuery) -> Result<PaginatedResponse<Subject>> {
        self.list_subjects_with_pagination_impl(school_id, query).await
    }

    async fn list_subjects_by_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<Subject>> {
        self.list_subjects_by_ids_impl(school_id, ids).await
    }

    async fn update_subject(&self, school_id: i64, id: i64, update: UpdateSubjectRequest) -> Result<Option<Subject>> {
        self.update_subject_impl(school_id, id, update).await
    }

    async fn delete_subject(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_subject_impl(school_id, id).await
    }


    // 成绩管理方法
    async fn upsert_grade(&self, school_id: i64, recorded_by: Option<i64>, req: CreateGradeRequest) -> Result<Grade> {
        self.upsert_grade_impl(school_id, recorded_by, req).await
    }

    async fn get_grade_by_id(&self, school_id: i64, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(school_id, id).await
    }

    async fn list_grades_with_pagination(&self, school_id: i64, query: GradeListQuery) -> Result<PaginatedResponse<Grade>> {
        self.list_grades_with_pagination_impl(school_id, query).await
    }

    async fn list_student_grades(&self, school_id: i64, student_id: i64, period: Option<&str>) -> Result<Vec<Grade>> {
        self.list_student_grades_impl(school_id, student_id, period).await
    }

    async fn update_grade(&self, school_id: i64, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>> {
        self.update_grade_impl(school_id, id, update).await
    }

    async fn delete_grade(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_grade_impl(school_id, id).await
    }


    // 考勤管理方法
    async fn upsert_attendance(&self, school_id: i64, record: AttendanceUpsert) -> Result<AttendanceRecord> {
        self.upsert_attendance_impl(school_id, record).await
    }

    async fn upsert_attendance_bulk(&self, school_id: i64, records: Vec<AttendanceUpsert>) -> Result<Vec<AttendanceRecord>> {
        self.upsert_attendance_bulk_impl(school_id, records).await
    }

    async fn get_attendance_by_id(&self, school_id: i64, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_by_id_impl(school_id, id).await
    }

    async fn list_attendance_with_pagination(&self, school_id: i64, query: AttendanceListQuery) -> Result<PaginatedResponse<AttendanceRecord>> {
        self.list_attendance_with_pagination_impl(school_id, query).await
    }

    async fn list_student_attendance_statuses(&self, school_id: i64, student_id: i64, date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Result<Vec<AttendanceStatus>> {
        self.list_student_attendance_statuses_impl(school_id, student_id, date_from, date_to).await
    }

    async fn update_attendance(&self, school_id: i64, id: i64, update: UpdateAttendanceRequest) -> Result<Option<AttendanceRecord>> {
        self.update_attendance_impl(school_id, id, update).await
    }

    async fn delete_attendance(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_attendance_impl(school_id, id).await
    }


    // 观察记录方法
    async fn create_observation(&self, school_id: i64, author_id: Option<i64>, req: CreateObservationRequest) -> Result<Observation> {
        self.create_observation_impl(school_id, author_id, req).await
    }

    async fn get_observation_by_id(&self, school_id: i64, id: i64) -> Result<Option<Observation>> {
        self.get_observation_by_id_impl(school_id, id).await
    }

    async fn list_observations_with_pagination(&self, school_id: i64, query: ObservationListQuery) -> Result<PaginatedResponse<Observation>> {
        self.list_observations_with_pagination_impl(school_id, query).await
    }

    async fn list_recent_observations(&self, school_id: i64, student_id: i64, limit: u64) -> Result<Vec<Observation>> {
        self.list_recent_observations_impl(school_id, student_id, limit).await
    }

    async fn count_observations(&self, school_id: i64, student_id: i64, category: Option<ObservationCategory>) -> Result<i64> {
        self.count_observations_impl(school_id, student_id, category).await
    }

    async fn delete_observation(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_observation_impl(school_id, id).await
    }


    // 缴费项目方法
    async fn create_concept(&self, school_id: i64, req: CreateConceptRequest) -> Result<PaymentConcept> {
        self.create_concept_impl(school_id, req).await
    }

    async fn get_concept_by_id(&self, school_id: i64, id: i64) -> Result<Option<PaymentConcept>> {
        self.get_concept_by_id_impl(school_id, id).await
    }

    async fn list_concepts_with_pagination(&self, school_id: i64, query: ConceptListQuery) -> Result<PaginatedResponse<PaymentConcept>> {
        self.list_concepts_with_pagination_impl(school_id, query).await
    }

    async fn update_concept(&self, school_id: i64, id: i64, update: UpdateConceptRequest) -> Result<Option<PaymentConcept>> {
        self.update_concept_impl(school_id, id, update).await
    }

    async fn delete_concept(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_concept_impl(school_id, id).await
    }


    // 欠款方法
    async fn create_debt(&self, school_id: i64, req: CreateDebtRequest, amount: f64) -> Result<Debt> {
        self.create_debt_impl(school_id, req, amount).await
    }

    async fn get_debt_by_id(&self, school_id: i64, id: i64) -> Result<Option<Debt>> {
        self.get_debt_by_id_impl(school_id, id).await
    }

    async fn list_debts_with_pagination(&self, school_id: i64, query: DebtListQuery) -> Result<PaginatedResponse<Debt>> {
        self.list_debts_with_pagination_impl(school_id, query).await
    }

    async fn list_student_debts(&self, school_id: i64, student_id: i64) -> Result<Vec<Debt>> {
        self.list_student_debts_impl(school_id, student_id).await
    }

    async fn update_debt(&self, school_id: i64, id: i64, update: UpdateDebtRequest) -> Result<Option<Debt>> {
        self.update_debt_impl(school_id, id, update).await
    }

    async fn delete_debt(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_debt_impl(school_id, id).await
    }

    async fn mark_overdue_debts(&self, school_id: Option<i64>, today: NaiveDate) -> Result<u64> {
        self.mark_overdue_debts_impl(school_id, today).await
    }


    // 付款方法
    async fn register_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.register_payment_impl(payment).await
    }

    async fn get_payment_by_id(&self, school_id: i64, id: i64) -> Result<Option<Payment>> {
        self.get_payment_by_id_impl(school_id, id).await
    }

    async fn get_payment_by_id_unscoped(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_by_id_unscoped_impl(id).await
    }

    async fn get_payment_by_intent_id(&self, intent_id: &str) -> Result<Option<Payment>> {
        self.get_payment_by_intent_id_impl(intent_id).await
    }

    async fn list_payments_with_pagination(&self, school_id: i64, query: PaymentListQuery) -> Result<PaginatedResponse<Payment>> {
        self.list_payments_with_pagination_impl(school_id, query).await
    }

    async fn list_student_payments(&self, school_id: i64, student_id: i64) -> Result<Vec<Payment>> {
        self.list_student_payments_impl(school_id, student_id).await
    }

    async fn list_paid_payments_between(&self, school_id: i64, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Payment>> {
        self.list_paid_payments_between_impl(school_id, from, to).await
    }

    async fn update_payment(&self, school_id: i64, id: i64, update: UpdatePaymentRequest) -> Result<Option<Payment>> {
        self.update_payment_impl(school_id, id, update).await
    }

    async fn settle_payment(&self, id: i64, paid_at: DateTime<Utc>) -> Result<Option<Payment>> {
        self.settle_payment_impl(id, paid_at).await
    }

    async fn cancel_pending_payment(&self, id: i64) -> Result<Option<Payment>> {
        self.cancel_pending_payment_impl(id).await
    }

    async fn set_payment_receipt_path(&self, id: i64, receipt_path: &str) -> Result<bool> {
        self.set_payment_receipt_path_impl(id, receipt_path).await
    }

    async fn delete_payment(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_payment_impl(school_id, id).await
    }


    // SPEI 参考号方法
    async fn create_spei_reference(&self, reference: NewSpeiReference) -> Result<SpeiReference> {
        self.create_spei_reference_impl(reference).await
    }

    async fn get_spei_reference_by_id(&self, school_id: i64, id: i64) -> Result<Option<SpeiReference>> {
        self.get_spei_reference_by_id_impl(school_id, id).await
    }

    async fn get_spei_reference_by_reference(&self, school_id: i64, reference: &str) -> Result<Option<SpeiReference>> {
        self.get_spei_reference_by_reference_impl(school_id, reference).await
    }

    async fn list_spei_references_with_pagination(&self, school_id: i64, query: SpeiListQuery) -> Result<PaginatedResponse<SpeiReference>> {
        self.list_spei_references_with_pagination_impl(school_id, query).await
    }

    async fn transition_pending_spei_reference(&self, id: i64, status: SpeiStatus) -> Result<bool> {
        self.transition_pending_spei_reference_impl(id, status).await
    }

    async fn cancel_pending_spei_reference(&self, id: i64) -> Result<bool> {
        self.cancel_pending_spei_reference_impl(id).await
    }

    async fn settle_spei_reference(&self, input: SpeiSettlementInput) -> Result<(SpeiReference, Payment)> {
        self.settle_spei_reference_impl(input).await
    }

    async fn expire_spei_references(&self, school_id: Option<i64>, now: DateTime<Utc>) -> Result<u64> {
        self.expire_spei_references_impl(school_id, now).await
    }


    // 文档完整性方法
    async fn record_document_hash(&self, hash: NewDocumentHash) -> Result<DocumentHash> {
        self.record_document_hash_impl(hash).await
    }

    async fn get_latest_document_hash(&self, school_id: Option<i64>, document_type: DocumentType, document_id: &str) -> Result<Option<DocumentHash>> {
        self.get_latest_document_hash_impl(school_id, document_type, document_id).await
    }


    // 仪表盘
    async fn dashboard_summary(&self, school_id: i64, now: DateTime<Utc>) -> Result<DashboardSummary> {
        self.dashboard_summary_impl(school_id, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("academiq.db").unwrap(),
            "sqlite://academiq.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
