pub mod json;
pub mod path;
pub mod validated;

/// An extractor wrapping a single extracted value.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
