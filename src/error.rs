//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the orbitrace crate.
///
/// Transient per-frame conditions (no drawable, zero-sized drawable) are not
/// errors; see [`crate::renderer::FrameOutcome`].
#[derive(Debug)]
pub enum TraceError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A GPU buffer or image could not be allocated.
    BufferAllocation {
        /// Debug label of the resource.
        label: String,
        /// Requested size in bytes.
        size: u64,
    },
    /// Compute kernel composition or pipeline creation failed.
    KernelLoad(String),
    /// Rejection sampling hit its retry cap without producing a point.
    SampleExhausted {
        /// Number of candidates drawn before giving up.
        attempts: u32,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization/validation failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::BufferAllocation { label, size } => {
                write!(f, "failed to allocate '{label}' ({size} bytes)")
            }
            Self::KernelLoad(msg) => write!(f, "kernel load error: {msg}"),
            Self::SampleExhausted { attempts } => write!(
                f,
                "unit-sphere rejection sampling gave up after {attempts} attempts"
            ),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for TraceError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for TraceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
