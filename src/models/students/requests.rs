use crate::models::common::{EnrollmentStatus, PaginationQuery};
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub group_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub enrollment_code: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub enrollment_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: i64,
    pub size: i64,
    pub group_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub search: Option<String>,
}
