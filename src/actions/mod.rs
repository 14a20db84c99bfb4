//! File actions.
//!
//! The only action is moving disposable duplicates to the system trash; see
//! [`dispose`] for the eligibility rules. Files are never deleted
//! permanently.

pub mod dispose;

pub use dispose::{
    check_eligible, dispose, DisposeConfig, DisposeError, DisposeProgressCallback, DisposeReport,
    SystemTrash, TrashCapability,
};
