//! Tree mutation helpers built on the [`crate::tree::DomTree`] primitives

pub mod merge;
pub mod unfold;
pub mod url;

pub use merge::{concat_properties_from, PropertySelection};
pub use unfold::unfold;
pub use url::file_name;
