//! 以字符串形式存储在数据库中的枚举

/// 定义字符串枚举的宏
///
/// 自动生成：
/// - enum 定义（serde 以给定字符串序列化）
/// - as_str() / ALL
/// - Display / FromStr（用于数据库列的读写）
#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $value:literal),* $(,)?
        }
    ) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, ts_rs::TS,
        )]
        $(#[$meta])*
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)*
                    _ => Err(format!("Invalid {} value: {s}", stringify!($name))),
                }
            }
        }
    };
}

define_string_enum! {
    /// 学生/教师的在籍状态
    #[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
    EnrollmentStatus {
        Active => "activo",
        Withdrawn => "baja",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_enum_round_trip_through_db_value() {
        assert_eq!(EnrollmentStatus::Active.as_str(), "activo");
        assert_eq!(
            "baja".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Withdrawn)
        );
        assert!("inactive".parse::<EnrollmentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&EnrollmentStatus::Withdrawn).unwrap(),
            "\"baja\""
        );
    }
}
