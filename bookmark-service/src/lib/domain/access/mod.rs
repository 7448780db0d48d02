pub mod errors;
pub mod guard;

pub use errors::GuardError;
pub use errors::RejectionReason;
pub use guard::AccessGuard;
