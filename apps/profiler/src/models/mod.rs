pub mod interview_session;
pub mod job_template;

pub use interview_session::InterviewSessionRow;
pub use job_template::JobTemplateRow;
