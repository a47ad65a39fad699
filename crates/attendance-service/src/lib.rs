//! # attendance-service
//!
//! Business logic service layer for the attendance tracker. Each service
//! resolves the right store credential for the caller and implements one
//! family of use cases on top of it.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod event;
pub mod event_type;
pub mod qr;
pub mod query;
pub mod summary;
pub mod user;

pub use context::RequestContext;
pub use event::{EventFilter, EventService};
pub use event_type::{EventTypePatch, EventTypeService, NewEventType};
pub use qr::{BadgeHolder, BadgeQr, QrService};
pub use query::{QueryExecutor, QueryOutcome, QueryStep};
pub use summary::{DbDetails, HealthReport, Summary, SummaryService};
pub use user::{NewUser, UserAdminService, UserPatch};
