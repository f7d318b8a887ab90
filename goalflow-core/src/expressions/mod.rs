mod field_path;
mod reference;
mod template;

pub use field_path::{FieldPath, FieldPathError, PathSegment};
pub use reference::{parse_reference, NowFormat, Reference, ReferenceError};
pub use template::{parse_template, Segment, Template, TemplateError};
