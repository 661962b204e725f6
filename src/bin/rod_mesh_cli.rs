use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rod_mesh::{
    MeshSummary, RodMeshError, RodMeshResult, mesh_from_json, write_block_mesh_dict,
    write_block_mesh_dict_file,
};

/// Generates OpenFOAM blockMeshDict files for cylindrical fuel rods.
#[derive(Parser)]
#[command(name = "rod-mesh")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Block-structured fuel rod meshes for blockMesh", long_about = None)]
struct Cli {
    /// Log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the blockMeshDict for a rod description
    Generate(GenerateArgs),
    /// Validate a rod description and print mesh statistics
    Check(CheckArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// JSON rod description
    config: PathBuf,
    /// Output file; the dictionary goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Overwrite an existing output file
    #[arg(long)]
    overwrite: bool,
    /// Seed for random pellet eccentricity
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct CheckArgs {
    /// JSON rod description
    config: PathBuf,
    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
    /// Seed for random pellet eccentricity
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .format_target(false)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => generate(&args),
        Commands::Check(args) => check(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rod-mesh error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_config(path: &Path) -> RodMeshResult<String> {
    fs::read_to_string(path).map_err(|err| {
        RodMeshError::Io(std::io::Error::new(
            err.kind(),
            format!("read {}: {err}", path.display()),
        ))
    })
}

fn generate(args: &GenerateArgs) -> RodMeshResult<()> {
    let model = mesh_from_json(&read_config(&args.config)?, args.seed)?;
    match args.output.as_deref() {
        Some(path) => write_block_mesh_dict_file(path, &model, args.overwrite)?,
        None => print!("{}", write_block_mesh_dict(&model)),
    }
    eprintln!("{}: {}", args.config.display(), MeshSummary::of(&model).summary());
    Ok(())
}

fn check(args: &CheckArgs) -> RodMeshResult<()> {
    let model = mesh_from_json(&read_config(&args.config)?, args.seed)?;
    let summary = MeshSummary::of(&model);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
        println!("  Patch names:");
        for name in model.patches.names() {
            println!("    {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_is_parsed_strictly() {
        let cli = Cli::try_parse_from(["rod-mesh", "--log-level", "debug", "check", "rod.json"])
            .unwrap();
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);

        let cli = Cli::try_parse_from(["rod-mesh", "check", "rod.json"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);

        assert!(Cli::try_parse_from(["rod-mesh", "--log-level", "loud", "check", "rod.json"]).is_err());
    }
}
