//! Data model for positioned text and layout results.
//!
//! Pages arrive from the extractor as [`Page`]s holding raw [`Fragment`]s.
//! Layout processing turns each into a [`PageResult`] whose fragments are in
//! reading order, and a batch of pages into a [`DocumentLayout`].

mod document;
mod fragment;
mod page;

pub use document::DocumentLayout;
pub use fragment::{BBox, Fragment, Glyph, RegionKind};
pub use page::{LayoutState, Page, PageResult, ReadingDirection};
