pub mod feedback;
pub mod project;
pub mod translator_language;
pub mod user;
