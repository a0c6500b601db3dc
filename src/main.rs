use clap::Parser;

use harvx::cli::{Cli, Commands};
use harvx::commands;

fn main() {
    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Some(Commands::Generate(args)) => commands::run_generate(args, &cli),
        Some(Commands::Preview(args)) => commands::run_preview(args, &cli),
        Some(Commands::Brief(args)) => commands::run_brief(args, &cli),
        Some(Commands::Slice(args)) => commands::run_slice(args, &cli),
        Some(Commands::Diff(args) | Commands::ReviewSlice(args)) => commands::run_diff(args, &cli),
        Some(Commands::Explain(args)) => commands::run_explain(args, &cli),
        Some(Commands::Doctor(args)) => commands::run_doctor(args, &cli),
        Some(Commands::Cache(args)) => commands::run_cache(args, &cli),
        None => commands::run_generate(&cli.generate, &cli),
    };

    std::process::exit(exit_code);
}
