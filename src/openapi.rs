use utoipa::OpenApi;

use crate::{
    book::BookRecord,
    catalog::CategoryFilter,
    error::{
        ApiError, BodyError, CatalogUnavailableError, Credential, GenerationUnavailableError,
        InternalServerError, MethodNotAllowedError, MissingCredentialError, NotFoundError,
        PathError, QueryError, SessionNotFoundError, ValidationError,
    },
    levels::{LearningArea, LevelRecord},
    recommend::LearnerProfile,
    route::{books, reading_list, sessions},
    shelf::SavedBook,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        books::search_books::search_books,
        sessions::create_session::create_session,
        sessions::saved_books::list_saved_books,
        sessions::saved_books::save_book,
        sessions::recommendations::recommend_book,
        sessions::levels::list_levels,
        sessions::levels::record_levels,
        reading_list::generate_reading_list::generate_reading_list,
        reading_list::list_tones::list_tones,
    ),
    components(schemas(
        BookRecord,
        SavedBook,
        CategoryFilter,
        LearnerProfile,
        LearningArea,
        LevelRecord,
        books::search_books::SearchBooksBody,
        books::search_books::SearchBooksResponse,
        sessions::create_session::CreateSessionResponse,
        sessions::saved_books::SavedBooksOrder,
        sessions::saved_books::SavedBooksResponse,
        sessions::saved_books::SaveBookBody,
        sessions::saved_books::SaveBookResponse,
        sessions::recommendations::RecommendBookBody,
        sessions::recommendations::RecommendBookResponse,
        sessions::levels::RecordLevelsBody,
        sessions::levels::LevelsResponse,
        reading_list::generate_reading_list::ReadingListBody,
        reading_list::generate_reading_list::ReadingListResponse,
        reading_list::list_tones::ListTonesResponse,
        ApiError,
        InternalServerError,
        QueryError,
        BodyError,
        PathError,
        ValidationError,
        MethodNotAllowedError,
        NotFoundError,
        SessionNotFoundError,
        Credential,
        MissingCredentialError,
        CatalogUnavailableError,
        GenerationUnavailableError,
    )),
    tags(
        (name = "books", description = "Book catalog search"),
        (name = "sessions", description = "Per-session shelf, recommendations and level log"),
        (name = "reading-list", description = "Generated reading lists"),
    )
)]
pub struct ApiDoc;
