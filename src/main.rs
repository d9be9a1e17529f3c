use std::{error::Error, path::PathBuf, time::Duration};

use clap::Parser;

use bomvet::{
    cli::args::{CliArgs, Command},
    config::BomvetConfig,
    Bomvet,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run() {
        log::error!("{error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args = CliArgs::parse();
    let config = BomvetConfig::load()?;

    let mut builder = Bomvet::builder().manifest_file_name(&cli_args.manifest_location);
    if let Some(cache_directory) = cli_args
        .cache_directory
        .map(PathBuf::from)
        .or(config.cache_dir)
    {
        builder = builder.cache_directory(cache_directory);
    }
    if let Some(timeout) = config.http_timeout {
        builder = builder.http_timeout(Duration::from_secs(timeout));
    }
    let bomvet = builder.try_build()?;

    match cli_args.cmd {
        Command::Verify { platform, threads } => bomvet.verify(platform.as_deref(), threads),
        Command::Resolve {
            dependency,
            platform,
        } => bomvet.resolve(&dependency, platform.as_deref()),
        Command::Repositories { platform } => bomvet.repositories(platform.as_deref()),
        Command::ClearCache => bomvet.clear_cache(),
    }
}
