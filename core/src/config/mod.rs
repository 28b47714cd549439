mod load;
mod types;

pub use load::{get_data_dir, load_default, load_from};
pub use types::{AppConfig, FinalizeConfig, LoggingConfig, RunnerConfig};
