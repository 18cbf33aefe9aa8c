pub mod enums;
pub mod pagination;
pub mod response;

pub use enums::EnrollmentStatus;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;

/// 金额保留两位小数
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
