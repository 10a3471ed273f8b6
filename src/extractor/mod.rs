pub mod json;
pub mod path;
pub mod query;
pub mod session;
pub mod validated;

/// Gives access to the value an extractor produced.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
