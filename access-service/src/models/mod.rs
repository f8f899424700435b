pub mod access_record;
pub mod role;

pub use access_record::{AccessRecord, CallerProfile};
pub use role::{has_role, level_of, Role};
