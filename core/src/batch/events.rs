/// Progress events emitted by the runner for a single-consumer presentation
/// layer. Rendering subscribes to these instead of sharing mutable state with
/// the worker tasks.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    TaskStarted {
        package: String,
    },
    TaskFinished {
        package: String,
        success: bool,
        duration_ms: u64,
    },
    /// The post-batch finalization command has started.
    Finalizing,
}
