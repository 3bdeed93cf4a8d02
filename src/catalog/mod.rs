pub mod csv;
pub mod normalize;
pub mod record;

pub use normalize::{normalize_code, normalize_record, normalize_records};
pub use record::{display_label, CourseId, CourseNode, NormalizedRecord, RawRecord};
