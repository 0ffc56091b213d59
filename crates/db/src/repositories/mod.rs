pub mod feedback_repo;
pub mod project_repo;
pub mod translator_language_repo;
pub mod user_repo;

pub use feedback_repo::FeedbackRepo;
pub use project_repo::ProjectRepo;
pub use translator_language_repo::TranslatorLanguageRepo;
pub use user_repo::UserRepo;
