//! Concurrent batch runner for package-manager invocations.
//!
//! One subprocess per package, at most `max_parallel` in flight. Per-package
//! failures are data, not control flow: every task runs to completion
//! regardless of sibling outcomes, and the report always accounts for the
//! whole batch.
//!
//! ```text
//! Vec<String> (package names)
//!   ↓
//! BatchConfig { action, packages, max_parallel, package_manager }
//!   ↓
//! BatchRunner::run() → Semaphore + FuturesUnordered → TaskOutcome per task
//!   ↓
//! BatchReport { succeeded, failed, duration_ms, status }
//! ```

mod events;
mod report;
mod runner;
mod types;

pub use events::BatchEvent;
pub use report::{BatchReport, BatchStatus, FailedPackage};
pub use runner::BatchRunner;
pub use types::{Action, BatchConfig, PackageTask, TaskOutcome};
