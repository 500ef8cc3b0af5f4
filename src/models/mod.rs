pub mod event;
pub mod palette;
pub mod user;

pub use event::{EventDraft, EventPatch, EventRecord, EventRow, Priority};
pub use user::AuthUser;
