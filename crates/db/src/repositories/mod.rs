//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped by client id.

pub mod account;
pub mod attachment;
pub mod dimension;
pub mod journal;
pub mod report;

pub use account::{AccountRepository, AccountRepositoryError};
pub use attachment::AttachmentRepository;
pub use dimension::{DimensionRepository, DimensionRepositoryError};
pub use journal::{AccountLedgerLine, JournalRepository, JournalRepositoryError};
pub use report::{ReportRepository, ReportRepositoryError};
