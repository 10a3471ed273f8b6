pub mod books;
pub mod reading_list;
pub mod sessions;
