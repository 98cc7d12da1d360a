// Job profile schema: the template model, the declarative field table,
// value coercion, and the filler that maps extracted text onto the template.

pub mod coerce;
pub mod fields;
pub mod filler;
pub mod template;

pub use fields::FieldSpec;
pub use filler::{fill, ExtractedFieldMap, FilledProfile};
pub use template::{leaf_paths, Template};

/// Sentinel written into any text field whose value is unknown.
pub const OPEN: &str = "OPEN";
