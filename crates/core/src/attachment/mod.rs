//! File attachments on journal entries.
//!
//! This module provides business logic for attachments:
//! - Upload checks (size cap, allowed MIME types, extension fallback)
//! - Storing bytes and recording the attachment
//! - Listing, downloading and removing attachments

mod error;
mod policy;
mod service;
mod types;

pub use error::AttachmentError;
pub use policy::AttachmentPolicy;
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{Attachment, AttachmentType, NewAttachment};
