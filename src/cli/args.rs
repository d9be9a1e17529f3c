use clap::Parser;

/// Verifies that Spring dependency definitions resolve cleanly against a
/// platform release.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Location of the bomvet manifest.
    #[clap(short, long, default_value = "bomvet.toml")]
    pub manifest_location: String,
    /// Location of the POM cache directory. Defaults to `$HOME/.bomvet/cache`.
    #[clap(short, long)]
    pub cache_directory: Option<String>,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Verifies every dependency in the manifest against a platform version
    Verify {
        /// Platform version to verify against, overriding the manifest
        #[clap(short, long)]
        platform: Option<String>,
        /// Number of worker threads
        #[clap(short, long, default_value_t = 4)]
        threads: usize,
    },
    /// Resolves one dependency and prints its transitive artifacts
    Resolve {
        /// Id of a manifest dependency, or a `group:artifact[:version]`
        /// coordinate
        dependency: String,
        #[clap(short, long)]
        platform: Option<String>,
    },
    /// Prints the repositories dependency resolution would consult
    Repositories {
        #[clap(short, long)]
        platform: Option<String>,
    },
    /// Deletes the POM cache
    ClearCache,
}
