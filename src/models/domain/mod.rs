pub mod exam_request;
pub mod generated_question;
pub mod validation;
pub use exam_request::{ExamRequest, QuestionType};
pub use generated_question::{Choice, GeneratedQuestion, QuestionBody};
pub use validation::ValidationOutcome;
