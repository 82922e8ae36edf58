pub mod payload;
pub mod review;
pub mod variant;

pub use payload::{ReviewPayload, SubjectRef};
pub use review::{DeleteOutcome, NewReview, RatingSummary, Review, ReviewChanges};
pub use variant::Variant;
