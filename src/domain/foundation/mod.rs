//! Foundation value objects shared by the domain layer.

mod ids;
mod text;
mod timestamp;

pub use ids::ConversationId;
pub use text::truncate;
pub use timestamp::Timestamp;
