use serde::{Deserialize, Serialize};

/// Overrides for the GPU-reported compute scheduling hints.
///
/// Both default to `None`, meaning the adapter's values are used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct KernelOptions {
    /// Execution-width hint (threads per SIMD group).
    pub preferred_thread_width: Option<u32>,
    /// Upper bound on invocations in one workgroup.
    pub max_threads_per_group: Option<u32>,
}
