//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academiq_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AcademiqError {
            $($variant(String),)*
        }

        impl AcademiqError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademiqError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademiqError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AcademiqError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AcademiqError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademiqError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academiq_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Resource Conflict"),
    PaymentGateway("E014", "Payment Gateway Error"),
    AiService("E015", "AI Service Error"),
    DocumentGeneration("E016", "Document Generation Error"),
    Signature("E017", "Signature Error"),
    HttpClient("E018", "HTTP Client Error"),
}

impl AcademiqError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突（不同数据库的报错文本不同）
    pub fn is_unique_violation(&self) -> bool {
        let msg = self.message();
        msg.contains("UNIQUE constraint failed")
            || msg.contains("duplicate key value")
            || msg.contains("Duplicate entry")
    }

    /// 是否为外键约束失败
    pub fn is_foreign_key_violation(&self) -> bool {
        let msg = self.message();
        msg.contains("FOREIGN KEY constraint failed") || msg.contains("foreign key constraint")
    }
}

impl fmt::Display for AcademiqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademiqError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AcademiqError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademiqError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AcademiqError {
    fn from(err: std::io::Error) -> Self {
        AcademiqError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AcademiqError {
    fn from(err: serde_json::Error) -> Self {
        AcademiqError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AcademiqError {
    fn from(err: chrono::ParseError) -> Self {
        AcademiqError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for AcademiqError {
    fn from(err: reqwest::Error) -> Self {
        AcademiqError::HttpClient(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcademiqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademiqError::cache_connection("test").code(), "E001");
        assert_eq!(AcademiqError::database_config("test").code(), "E003");
        assert_eq!(AcademiqError::validation("test").code(), "E007");
        assert_eq!(AcademiqError::payment_gateway("test").code(), "E014");
        assert_eq!(AcademiqError::ai_service("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademiqError::signature("test").error_type(),
            "Signature Error"
        );
        assert_eq!(
            AcademiqError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AcademiqError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = AcademiqError::not_found("Student 7");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Student 7"));
    }

    #[test]
    fn test_constraint_detection() {
        let err = AcademiqError::database_operation(
            "Execution Error: UNIQUE constraint failed: students.enrollment_code",
        );
        assert!(err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());

        let err = AcademiqError::database_operation("FOREIGN KEY constraint failed");
        assert!(err.is_foreign_key_violation());
    }
}
