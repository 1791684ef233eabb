pub mod amenity;
pub mod booking;
pub mod intent;
pub mod space;
pub mod user;

pub use amenity::Amenity;
pub use booking::{BookingRecord, BookingStatus};
pub use intent::{AssistantIntent, RemoteAssistantReply, RemoteSearchReply, SearchCriteria};
pub use space::{CatalogEntry, NewSpace};
pub use user::User;
