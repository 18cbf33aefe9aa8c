use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    PaginatedResponse,
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层接口
///
/// 除学校、用户以及公开校验所需的少数查询外，所有方法都以 `school_id` 限定租户，
/// 其他学校的记录视同不存在。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校管理方法
    // 创建学校，可同时创建首个管理员（同一事务）
    async fn create_school(
        &self,
        school: CreateSchoolRequest,
        admin: Option<CreateUserRequest>,
    ) -> Result<(School, Option<User>)>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;

    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 学生管理方法
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, school_id: i64, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    // 班级内的全部学生
    async fn list_students_by_group(&self, school_id: i64, group_id: i64) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 教师管理方法
    async fn create_teacher(&self, school_id: i64, req: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, school_id: i64, id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        school_id: i64,
        query: TeacherListQuery,
    ) -> Result<PaginatedResponse<Teacher>>;
    async fn update_teacher(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 班级管理方法
    async fn create_group(&self, school_id: i64, req: CreateGroupRequest) -> Result<Group>;
    async fn get_group_by_id(&self, school_id: i64, id: i64) -> Result<Option<Group>>;
    async fn list_groups_with_pagination(
        &self,
        school_id: i64,
        query: GroupListQuery,
    ) -> Result<PaginatedResponse<Group>>;
    async fn update_group(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateGroupRequest,
    ) -> Result<Option<Group>>;
    async fn delete_group(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 科目管理方法
    async fn create_subject(&self, school_id: i64, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, school_id: i64, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        school_id: i64,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<Subject>>;
    async fn list_subjects_by_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<Subject>>;
    async fn update_subject(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 成绩管理方法
    // 学生/科目/评价期已存在时覆盖分数
    async fn upsert_grade(
        &self,
        school_id: i64,
        recorded_by: Option<i64>,
        req: CreateGradeRequest,
    ) -> Result<Grade>;
    async fn get_grade_by_id(&self, school_id: i64, id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(
        &self,
        school_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<Grade>>;
    // 学生的全部成绩，可按评价期过滤
    async fn list_student_grades(
        &self,
        school_id: i64,
        student_id: i64,
        period: Option<&str>,
    ) -> Result<Vec<Grade>>;
    async fn update_grade(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>>;
    async fn delete_grade(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 考勤管理方法
    async fn upsert_attendance(
        &self,
        school_id: i64,
        record: AttendanceUpsert,
    ) -> Result<AttendanceRecord>;
    // 批量点名（同一事务）
    async fn upsert_attendance_bulk(
        &self,
        school_id: i64,
        records: Vec<AttendanceUpsert>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn get_attendance_by_id(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AttendanceRecord>>;
    async fn list_attendance_with_pagination(
        &self,
        school_id: i64,
        query: AttendanceListQuery,
    ) -> Result<PaginatedResponse<AttendanceRecord>>;
    async fn list_student_attendance_statuses(
        &self,
        school_id: i64,
        student_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceStatus>>;
    async fn update_attendance(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecord>>;
    async fn delete_attendance(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 观察记录方法
    async fn create_observation(
        &self,
        school_id: i64,
        author_id: Option<i64>,
        req: CreateObservationRequest,
    ) -> Result<Observation>;
    async fn get_observation_by_id(&self, school_id: i64, id: i64)
    -> Result<Option<Observation>>;
    async fn list_observations_with_pagination(
        &self,
        school_id: i64,
        query: ObservationListQuery,
    ) -> Result<PaginatedResponse<Observation>>;
    // 学生最近的观察记录
    async fn list_recent_observations(
        &self,
        school_id: i64,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<Observation>>;
    async fn count_observations(
        &self,
        school_id: i64,
        student_id: i64,
        category: Option<ObservationCategory>,
    ) -> Result<i64>;
    async fn delete_observation(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 缴费项目方法
    async fn create_concept(
        &self,
        school_id: i64,
        req: CreateConceptRequest,
    ) -> Result<PaymentConcept>;
    async fn get_concept_by_id(&self, school_id: i64, id: i64) -> Result<Option<PaymentConcept>>;
    async fn list_concepts_with_pagination(
        &self,
        school_id: i64,
        query: ConceptListQuery,
    ) -> Result<PaginatedResponse<PaymentConcept>>;
    async fn update_concept(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateConceptRequest,
    ) -> Result<Option<PaymentConcept>>;
    // 被欠款或付款引用时返回冲突错误
    async fn delete_concept(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 欠款方法
    // 金额已由服务层确定
    async fn create_debt(&self, school_id: i64, req: CreateDebtRequest, amount: f64)
    -> Result<Debt>;
    async fn get_debt_by_id(&self, school_id: i64, id: i64) -> Result<Option<Debt>>;
    async fn list_debts_with_pagination(
        &self,
        school_id: i64,
        query: DebtListQuery,
    ) -> Result<PaginatedResponse<Debt>>;
    async fn list_student_debts(&self, school_id: i64, student_id: i64) -> Result<Vec<Debt>>;
    async fn update_debt(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateDebtRequest,
    ) -> Result<Option<Debt>>;
    async fn delete_debt(&self, school_id: i64, id: i64) -> Result<bool>;
    // 到期未付的欠款转为逾期，school_id 为空时处理全部学校
    async fn mark_overdue_debts(&self, school_id: Option<i64>, today: NaiveDate) -> Result<u64>;

    /// 付款方法
    // 插入付款；状态为已付且关联欠款时，欠款同时转为已付（同一事务）
    async fn register_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_id(&self, school_id: i64, id: i64) -> Result<Option<Payment>>;
    // 不限定学校（公开收据校验、Stripe 回调）
    async fn get_payment_by_id_unscoped(&self, id: i64) -> Result<Option<Payment>>;
    async fn get_payment_by_intent_id(&self, intent_id: &str) -> Result<Option<Payment>>;
    async fn list_payments_with_pagination(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>>;
    async fn list_student_payments(&self, school_id: i64, student_id: i64)
    -> Result<Vec<Payment>>;
    // 时间段内已付款项（收入报表）
    async fn list_paid_payments_between(
        &self,
        school_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Payment>>;
    async fn update_payment(
        &self,
        school_id: i64,
        id: i64,
        update: UpdatePaymentRequest,
    ) -> Result<Option<Payment>>;
    // 待付款转为已付并结清关联欠款（同一事务）；None 表示未发生转换
    async fn settle_payment(&self, id: i64, paid_at: DateTime<Utc>) -> Result<Option<Payment>>;
    // None 表示付款不存在或已不是待付
    async fn cancel_pending_payment(&self, id: i64) -> Result<Option<Payment>>;
    async fn set_payment_receipt_path(&self, id: i64, receipt_path: &str) -> Result<bool>;
    // 只能删除未付款项
    async fn delete_payment(&self, school_id: i64, id: i64) -> Result<bool>;

    /// SPEI 参考号方法
    async fn create_spei_reference(&self, reference: NewSpeiReference) -> Result<SpeiReference>;
    async fn get_spei_reference_by_id(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<SpeiReference>>;
    async fn get_spei_reference_by_reference(
        &self,
        school_id: i64,
        reference: &str,
    ) -> Result<Option<SpeiReference>>;
    async fn list_spei_references_with_pagination(
        &self,
        school_id: i64,
        query: SpeiListQuery,
    ) -> Result<PaginatedResponse<SpeiReference>>;
    // 仅当当前为待付时修改状态，返回是否修改成功
    async fn transition_pending_spei_reference(&self, id: i64, status: SpeiStatus)
    -> Result<bool>;
    // 人工取消：待付转为 caducado 并记录取消时间
    async fn cancel_pending_spei_reference(&self, id: i64) -> Result<bool>;
    // 参考号结算 + 付款 + 欠款（同一事务）
    async fn settle_spei_reference(
        &self,
        input: SpeiSettlementInput,
    ) -> Result<(SpeiReference, Payment)>;
    // 过期的待付参考号转为 caducado，school_id 为空时处理全部学校
    async fn expire_spei_references(
        &self,
        school_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<u64>;

    /// 文档完整性方法
    async fn record_document_hash(&self, hash: NewDocumentHash) -> Result<DocumentHash>;
    // 最新一条记录，school_id 为空时不限定学校
    async fn get_latest_document_hash(
        &self,
        school_id: Option<i64>,
        document_type: DocumentType,
        document_id: &str,
    ) -> Result<Option<DocumentHash>>;

    /// 仪表盘
    async fn dashboard_summary(&self, school_id: i64, now: DateTime<Utc>)
    -> Result<DashboardSummary>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
