pub mod event;
pub mod report;

pub use event::CreateUserEvent;
pub use report::{EnrollmentOutcome, EnrollmentReport, EnrollmentStatus};
