#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use edgerank_core::timing::PhaseTimer;
use output::{CliError, OutputMode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "edgerank",
    author,
    version,
    about = "edgerank: edge-list PageRank, BFS and degree analytics",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for edgerank.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit a per-command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Run the full pipeline: degrees, PageRank, BFS",
        long_about = "Load an edge list, write the out-degree histogram and the PageRank vector, \
                      then run a breadth-first traversal. Settings come from edgerank.toml, the \
                      user config, and flags, in increasing precedence.",
        after_help = "EXAMPLES:\n    # Default run: degrees.txt and proba.txt in the current directory\n    edgerank run graph.txt\n\n    # Fewer sweeps, BFS from node 3 written to a file\n    edgerank run graph.txt --iterations 20 --start 3 --bfs-out order.txt\n\n    # Emit machine-readable output\n    edgerank run graph.txt --format json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Compute PageRank over the edge list",
        after_help = "EXAMPLES:\n    # Show the ten highest-ranked nodes\n    edgerank pagerank graph.txt\n\n    # Write the full vector\n    edgerank pagerank graph.txt --damping 0.2 --out proba.txt"
    )]
    Pagerank(cmd::pagerank::PagerankArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Breadth-first traversal from a start node",
        after_help = "EXAMPLES:\n    # Visitation order from node 0\n    edgerank bfs graph.txt\n\n    # Scan the edge list instead of indexing it\n    edgerank bfs graph.txt --start 5 --scan"
    )]
    Bfs(cmd::bfs::BfsArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Out-degree histogram",
        after_help = "EXAMPLES:\n    # Print \"<degree> <count>\" lines\n    edgerank degrees graph.txt\n\n    # Write them to a file\n    edgerank degrees graph.txt --out degrees.txt"
    )]
    Degrees(cmd::degrees::DegreesArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Summary statistics for an edge list",
        after_help = "EXAMPLES:\n    # Node, edge and degree statistics\n    edgerank stats graph.txt\n\n    # Emit machine-readable output\n    edgerank stats graph.txt --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    edgerank completions bash\n\n    # Generate zsh completions\n    edgerank completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Default log directives for the verbosity flags.
const fn default_directives(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "edgerank=debug,info"
    } else {
        "edgerank=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("EDGERANK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    let format = env::var("EDGERANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn dispatch(command: &Commands, output: OutputMode, timer: &mut PhaseTimer) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => timer.time("cmd.run", || cmd::run::run_run(args, output)),
        Commands::Pagerank(args) => {
            timer.time("cmd.pagerank", || cmd::pagerank::run_pagerank(args, output))
        }
        Commands::Bfs(args) => timer.time("cmd.bfs", || cmd::bfs::run_bfs(args, output)),
        Commands::Degrees(args) => {
            timer.time("cmd.degrees", || cmd::degrees::run_degrees(args, output))
        }
        Commands::Stats(args) => timer.time("cmd.stats", || cmd::stats::run_stats(args, output)),
        Commands::Completions(args) => timer.time("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let output = cli.output_mode();
    debug!(?output, "output mode resolved");

    let mut timer = PhaseTimer::start();
    let result = dispatch(&cli.command, output, &mut timer);

    if cli.timing {
        let report = timer.finish();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else if output.is_json() {
            eprintln!("{}", report.to_json());
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render_err) = output::render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} (while rendering: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["edgerank", "--timing", "stats", "g.txt"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["edgerank", "bfs", "g.txt", "--timing", "--start", "2"]);
        assert!(cli.timing);
        match cli.command {
            Commands::Bfs(args) => {
                assert_eq!(args.start, 2);
                assert_eq!(args.input.input, PathBuf::from("g.txt"));
            }
            other => panic!("expected bfs, got {other:?}"),
        }
    }

    #[test]
    fn json_flag_forces_json_output() {
        let cli = Cli::parse_from(["edgerank", "degrees", "g.txt", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_selects_mode() {
        let cli = Cli::parse_from(["edgerank", "--format", "text", "stats", "g.txt"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["edgerank", "-v", "-q", "stats", "g.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn directives_follow_verbosity() {
        assert_eq!(default_directives(false, false), "edgerank=info,warn");
        assert_eq!(default_directives(true, false), "edgerank=debug,info");
        assert_eq!(default_directives(false, true), "error");
    }

    #[test]
    fn pagerank_defaults() {
        let cli = Cli::parse_from(["edgerank", "pagerank", "g.txt"]);
        match cli.command {
            Commands::Pagerank(args) => {
                assert!((args.damping - 0.15).abs() < f64::EPSILON);
                assert_eq!(args.iterations, 100);
                assert_eq!(args.top, 10);
                assert!(!args.reject_zero_degree);
                assert!(args.out.is_none());
            }
            other => panic!("expected pagerank, got {other:?}"),
        }
    }

    #[test]
    fn run_input_is_optional() {
        let cli = Cli::parse_from(["edgerank", "run", "--config", "edgerank.toml"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.input.is_none());
                assert_eq!(args.config, Some(PathBuf::from("edgerank.toml")));
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn run_scan_and_indexed_conflict() {
        let result = Cli::try_parse_from(["edgerank", "run", "g.txt", "--scan", "--indexed"]);
        assert!(result.is_err());
    }

    #[test]
    fn metric_commands_require_input() {
        for cmd in ["pagerank", "bfs", "degrees", "stats"] {
            assert!(
                Cli::try_parse_from(["edgerank", cmd]).is_err(),
                "{cmd} should require an input path"
            );
        }
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["edgerank", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["edgerank", "run", "g.txt"],
            vec!["edgerank", "pagerank", "g.txt"],
            vec!["edgerank", "bfs", "g.txt"],
            vec!["edgerank", "degrees", "g.txt"],
            vec!["edgerank", "stats", "g.txt", "--mmap", "--strict"],
            vec!["edgerank", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "failed to parse {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
