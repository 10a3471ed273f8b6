pub mod app;
pub mod generate_reading_list;
pub mod list_tones;
