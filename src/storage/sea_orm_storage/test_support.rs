//! 测试用的临时 SQLite 数据库

use actix_web::{HttpMessage, HttpRequest, test, web};
use std::sync::Arc;

use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::models::{
    concepts::{entities::PaymentConcept, requests::CreateConceptRequest},
    schools::{entities::School, requests::CreateSchoolRequest},
    spei::{entities::SpeiReference, requests::NewSpeiReference},
    students::{entities::Student, requests::CreateStudentRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;

pub(crate) struct TestDb {
    pub storage: Arc<SeaOrmStorage>,
    pub school: School,
    pub admin: User,
    pub student: Student,
    pub concept: PaymentConcept,
    // 保持临时目录存活
    _dir: tempfile::TempDir,
}

impl TestDb {
    pub fn dyn_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    /// 以本校管理员身份发出的请求（跳过令牌中间件）
    pub fn admin_request(&self) -> HttpRequest {
        let request = test::TestRequest::default()
            .app_data(web::Data::new(self.dyn_storage()))
            .to_http_request();
        request.extensions_mut().insert(self.admin.clone());
        request
    }

    /// 本校学生与缴费项目下的待付参考号，不关联欠款
    pub async fn pending_reference(
        &self,
        code: &str,
        amount: f64,
        expires_in: chrono::Duration,
    ) -> SpeiReference {
        self.storage
            .create_spei_reference(NewSpeiReference {
                school_id: self.school.id,
                student_id: self.student.id,
                concept_id: self.concept.id,
                debt_id: None,
                reference: code.to_string(),
                amount,
                expires_at: chrono::Utc::now() + expires_in,
            })
            .await
            .expect("create SPEI reference")
    }
}

/// 创建已迁移的空数据库
pub(crate) async fn empty_storage() -> (Arc<SeaOrmStorage>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let config = DatabaseConfig {
        pool_size: 2,
        ..Default::default()
    };
    let storage = SeaOrmStorage::connect(&url, &config)
        .await
        .expect("connect test database");
    (Arc::new(storage), dir)
}

/// 创建数据库并写入一所学校、一名管理员、一名学生和一个缴费项目
pub(crate) async fn seeded() -> TestDb {
    let (storage, dir) = empty_storage().await;

    let (school, admin) = storage
        .create_school(
            CreateSchoolRequest {
                name: "Colegio Prueba".to_string(),
                slug: "colegio-prueba".to_string(),
                clabe: Some("012180001234567891".to_string()),
                admin: None,
            },
            Some(CreateUserRequest {
                username: "admin".to_string(),
                email: "admin@prueba.mx".to_string(),
                password: crate::utils::password::hash_password("Secret123!")
                    .expect("hash password"),
                role: UserRole::Admin,
                display_name: Some("Admin".to_string()),
                school_id: None,
            }),
        )
        .await
        .expect("create school");

    let student = storage
        .create_student(
            school.id,
            CreateStudentRequest {
                enrollment_code: "A001".to_string(),
                first_name: "Ana".to_string(),
                last_name: "López".to_string(),
                group_id: None,
                guardian_name: Some("María López".to_string()),
                guardian_email: None,
                guardian_phone: None,
            },
        )
        .await
        .expect("create student");

    let concept = storage
        .create_concept(
            school.id,
            CreateConceptRequest {
                name: "Colegiatura".to_string(),
                description: None,
                default_amount: 2500.0,
            },
        )
        .await
        .expect("create concept");

    TestDb {
        storage,
        school,
        admin: admin.expect("school admin"),
        student,
        concept,
        _dir: dir,
    }
}
