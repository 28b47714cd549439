mod process;
pub mod traits;

pub use process::ProcessCommandRunner;
pub use traits::{CommandOutput, CommandRunner};
