pub mod ai;
pub mod attendance;
pub mod auth;
pub mod concepts;
pub mod dashboard;
pub mod debts;
pub mod documents;
pub mod frontend;
pub mod grades;
pub mod groups;
pub mod observations;
pub mod payments;
pub mod public_files;
pub mod schools;
pub mod spei;
pub mod stripe;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
pub mod validar;

pub use ai::configure_ai_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use concepts::configure_concept_routes;
pub use dashboard::configure_dashboard_routes;
pub use debts::configure_debt_routes;
pub use documents::{configure_document_routes, configure_report_routes};
pub use frontend::configure_frontend_routes;
pub use grades::configure_grade_routes;
pub use groups::configure_group_routes;
pub use observations::configure_observation_routes;
pub use payments::configure_payment_routes;
pub use public_files::configure_public_file_routes;
pub use schools::configure_school_routes;
pub use spei::configure_spei_routes;
pub use stripe::configure_stripe_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;
pub use validar::configure_validar_routes;

/// 注册全部接口路由（不含前端兜底）
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_school_routes)
        .configure(configure_user_routes)
        .configure(configure_student_routes)
        .configure(configure_teacher_routes)
        .configure(configure_group_routes)
        .configure(configure_subject_routes)
        .configure(configure_grade_routes)
        .configure(configure_attendance_routes)
        .configure(configure_observation_routes)
        .configure(configure_concept_routes)
        .configure(configure_debt_routes)
        .configure(configure_payment_routes)
        .configure(configure_spei_routes)
        .configure(configure_stripe_routes)
        .configure(configure_document_routes)
        .configure(configure_report_routes)
        .configure(configure_ai_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_validar_routes);
}
