pub mod app;
pub mod create_session;
pub mod levels;
pub mod recommendations;
pub mod saved_books;
