//! User card view model: fetch one user over HTTP and hand the result to a
//! view on the UI thread, falling back to a placeholder on any failure.

use shared::domain::UserRecord;

pub mod coordinator;
pub mod error;
pub mod output;
pub mod service;
pub mod subject;

pub use coordinator::{FetchCoordinator, FetchPhase, FetchTicket, PumpReport, StalePolicy};
pub use error::FetchError;
pub use output::UserViewOutput;
pub use service::{HttpUserService, MissingUserService, UserFetchService, UserServiceOptions};
pub use subject::Subject;

pub type FetchOutcome = Result<UserRecord, FetchError>;
