//! 预导入模块，方便使用

pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::debts::{ActiveModel as DebtActiveModel, Entity as Debts, Model as DebtModel};
pub use super::document_hashes::{
    ActiveModel as DocumentHashActiveModel, Entity as DocumentHashes, Model as DocumentHashModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::observations::{
    ActiveModel as ObservationActiveModel, Entity as Observations, Model as ObservationModel,
};
pub use super::payment_concepts::{
    ActiveModel as PaymentConceptActiveModel, Entity as PaymentConcepts,
    Model as PaymentConceptModel,
};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::spei_references::{
    ActiveModel as SpeiReferenceActiveModel, Entity as SpeiReferences, Model as SpeiReferenceModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
