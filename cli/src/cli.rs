use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pkgbatch",
    version,
    about = "Batch install/uninstall packages through a package-manager CLI"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install one or more packages concurrently.
    #[command(visible_alias = "i", alias = "add")]
    Install(PackageArgs),

    /// Uninstall one or more packages concurrently.
    #[command(visible_alias = "rm", alias = "remove")]
    Uninstall(PackageArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PackageArgs {
    /// Packages to process; each becomes one independent task.
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Skip the post-batch finalization command.
    #[arg(long)]
    pub no_finalize: bool,

    /// Maximum package invocations in flight at once.
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// Package-manager binary (overrides config).
    #[arg(long)]
    pub pm: Option<String>,

    /// Print the final report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// ASCII status markers (no Unicode).
    #[arg(long)]
    pub ascii: bool,

    /// Suppress progress output, print only the summary.
    #[arg(long)]
    pub quiet: bool,
}
