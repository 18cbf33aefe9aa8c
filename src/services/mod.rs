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
pub mod jobs;
pub mod observations;
pub mod payments;
pub mod schools;
pub mod spei;
pub mod stripe;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
pub mod validar;

pub use ai::AiService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use concepts::ConceptService;
pub use dashboard::DashboardService;
pub use debts::DebtService;
pub use documents::DocumentService;
pub use grades::GradeService;
pub use groups::GroupService;
pub use observations::ObservationService;
pub use payments::PaymentService;
pub use schools::SchoolService;
pub use spei::SpeiService;
pub use stripe::StripeService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teachers::TeacherService;
pub use users::UserService;
pub use validar::ValidarService;
