pub mod category;
pub mod participant;

pub use category::Category;
pub use participant::Participant;

pub type SchoolId = i64;
pub type ParticipantId = i64;
pub type ResultId = i64;
