pub mod json;
pub mod path;
pub mod validated;

/// An extractor that exposes the value it extracted, so other extractors can wrap it.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
