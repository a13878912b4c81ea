use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

pub mod cable;
pub mod common;
pub mod ymap;
pub mod ynv;
pub mod ytyp;

#[derive(Error, Debug)]
pub enum CodecError {
    /// Well-formedness or schema failure. Fatal, no partial document.
    #[error(transparent)]
    Xml(#[from] ragemap_xml::XmlError),

    /// A tagged item whose `type=` is not in the known set. Readers
    /// recover from this locally; it only surfaces from strict helpers.
    #[error("unknown item type {type_name}")]
    UnknownVariant { type_name: String },

    /// An id reference that does not resolve against its owning collection.
    #[error("unresolved {what} reference {id}")]
    Reference { what: &'static str, id: i64 },

    /// An export-time invariant violation. Writers abort on this.
    #[error("integrity violation in {what}: {reason}")]
    Integrity { what: &'static str, reason: String },

    /// The occluder vertex format stores indices as single bytes.
    #[error("occluder model has {count} vertices, the format stores at most 256")]
    TooManyVerts { count: usize },

    #[error("read aborted by caller")]
    Aborted,

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub const MAX_OCCLUDER_VERTS: usize = 256;

/// Cooperative cancellation flag. Readers poll it between top-level list
/// entries; writers are all-or-nothing and never poll.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<(), CodecError> {
        if self.is_aborted() {
            Err(CodecError::Aborted)
        } else {
            Ok(())
        }
    }
}
