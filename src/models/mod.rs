//! 业务数据模型
//!
//! 与 `entity` 中的 SeaORM 实体分离，用于 API 请求/响应和服务层之间传递。

pub mod ai;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod concepts;
pub mod dashboard;
pub mod debts;
pub mod documents;
pub mod grades;
pub mod groups;
pub mod observations;
pub mod payments;
pub mod schools;
pub mod spei;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证；3xxx 学业模块；4xxx 财务模块；5xxx 文档与外部服务。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    Unauthorized = 2001,
    AuthFailed = 2002,
    Forbidden = 2003,
    UserNotFound = 2004,
    UserAlreadyExists = 2005,
    SchoolNotFound = 2010,
    SchoolAlreadyExists = 2011,

    StudentNotFound = 3001,
    StudentAlreadyExists = 3002,
    TeacherNotFound = 3011,
    TeacherAlreadyExists = 3012,
    GroupNotFound = 3021,
    GroupAlreadyExists = 3022,
    SubjectNotFound = 3031,
    SubjectAlreadyExists = 3032,
    GradeNotFound = 3041,
    GradeOutOfRange = 3042,
    AttendanceNotFound = 3051,
    ObservationNotFound = 3061,

    ConceptNotFound = 4001,
    ConceptInUse = 4002,
    DebtNotFound = 4011,
    DebtAlreadyPaid = 4012,
    PaymentNotFound = 4021,
    PaymentInvalidState = 4022,
    SpeiReferenceNotFound = 4031,
    SpeiReferenceNotPending = 4032,
    SpeiReferenceExpired = 4033,
    SpeiAmountMismatch = 4034,
    StripeNotConfigured = 4041,
    StripeGatewayError = 4042,
    StripeSignatureInvalid = 4043,

    DocumentNotFound = 5001,
    DocumentGenerationFailed = 5002,
    DocumentTampered = 5003,
    ValidationTokenInvalid = 5011,
    AiNotConfigured = 5021,
    AiServiceError = 5022,
}
