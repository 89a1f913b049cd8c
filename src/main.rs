// repairlog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the analyze / search / equipment / stats commands

use clap::{Parser, Subcommand};
use repairlog::app::{analyze, query};
use repairlog::core::model::{ExportFormat, RepairInstruction};
use repairlog::platform::config::{self, AppConfig, PlatformPaths};
use repairlog::util::constants;
use repairlog::util::error::{IngestError, KnowledgeError, RepairLogError};
use repairlog::util::logging;
use std::path::PathBuf;

/// repairlog - turn an exported maintenance log into repair instructions.
///
/// Extracts "what happened" / "what did you do" phrases from the comments
/// column, groups them by area, machine and mechanism node, and writes one
/// deduplicated instruction per distinct problem.
#[derive(Parser, Debug)]
#[command(name = "repairlog", version, about)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build repair instructions from a maintenance log CSV.
    Analyze {
        /// Exported maintenance log (CSV with a header row).
        input: PathBuf,

        /// Output file, or "-" for stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output format: json or csv.
        #[arg(short = 'f', long = "format")]
        format: Option<ExportFormat>,

        /// Text placed between distinct solutions of one problem (1-16 characters).
        #[arg(long = "separator", value_parser = parse_separator)]
        separator: Option<String>,
    },

    /// Find instructions relevant to a problem description.
    Search {
        /// Instruction document written by `analyze`.
        instructions: PathBuf,

        /// Problem description.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results (1-100).
        #[arg(short = 'n', long = "limit", value_parser = parse_limit)]
        limit: Option<usize>,
    },

    /// List instructions for equipment whose name contains NAME.
    Equipment {
        /// Instruction document written by `analyze`.
        instructions: PathBuf,

        /// Equipment name fragment (case-insensitive).
        name: String,
    },

    /// Count instructions per problem category.
    Stats {
        /// Instruction document written by `analyze`.
        instructions: PathBuf,
    },
}

fn parse_separator(s: &str) -> Result<String, String> {
    config::check_solution_separator(s)?;
    Ok(s.to_string())
}

fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    config::check_max_results(n)?;
    Ok(n)
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    // Config is read before logging so that [logging] level can take effect;
    // its warnings are replayed once the subscriber is installed.
    let loaded = match &cli.config {
        Some(path) => config::load_config(path, true),
        None => config::load_config(&PlatformPaths::resolve().config_file(), false),
    };
    let (app_config, warnings) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            logging::init(cli.debug, None);
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {e}");
            return constants::EXIT_FAILURE;
        }
    };

    logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(
        version = constants::APP_VERSION,
        command = ?cli.command,
        "repairlog starting"
    );

    let result = match cli.command {
        Command::Analyze {
            input,
            output,
            format,
            separator,
        } => cmd_analyze(&app_config, input, output, format, separator),
        Command::Search {
            instructions,
            query,
            limit,
        } => cmd_search(&app_config, instructions, &query.join(" "), limit),
        Command::Equipment { instructions, name } => cmd_equipment(instructions, &name),
        Command::Stats { instructions } => cmd_stats(instructions),
    };

    match result {
        Ok(()) => constants::EXIT_OK,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

/// Map an error to the process exit code.
fn exit_code_for(error: &RepairLogError) -> i32 {
    match error {
        RepairLogError::Ingest(IngestError::FileNotFound { .. })
        | RepairLogError::Knowledge(KnowledgeError::FileNotFound { .. }) => {
            constants::EXIT_INPUT_NOT_FOUND
        }
        RepairLogError::Export(_) => constants::EXIT_OUTPUT_FAILED,
        _ => constants::EXIT_FAILURE,
    }
}

/// Output path precedence: --output > [output] path > default. Only the
/// built-in default name takes its extension from the format.
fn resolve_output(config: &AppConfig, output: Option<PathBuf>, format: ExportFormat) -> PathBuf {
    output
        .or_else(|| config.output_path.clone())
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_FILE).with_extension(format.label()))
}

fn cmd_analyze(
    config: &AppConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    separator: Option<String>,
) -> repairlog::util::error::Result<()> {
    let format = format.unwrap_or(config.output_format);
    let request = analyze::AnalysisRequest {
        input,
        output: resolve_output(config, output, format),
        format,
        solution_separator: separator.unwrap_or_else(|| config.solution_separator.clone()),
    };

    let report = analyze::run_analysis(&request)?;

    // Keep stdout clean when the document itself went there.
    if !repairlog::platform::fs::is_stdout(&report.output) {
        println!(
            "Analysis complete: {} instructions written to {} ({} of {} rows used)",
            report.instructions_written,
            report.output.display(),
            report.rows_extracted,
            report.rows_total,
        );
    }
    Ok(())
}

fn print_instruction(index: usize, inst: &RepairInstruction) {
    println!("{index}. {} ({} / {})", inst.equipment_group, inst.area, inst.component);
    println!("   Problem:  {}", inst.problem);
    println!("   Solution: {}", inst.solution);
}

fn cmd_search(
    config: &AppConfig,
    instructions: PathBuf,
    description: &str,
    limit: Option<usize>,
) -> repairlog::util::error::Result<()> {
    let kb = query::load_knowledge(&instructions)?;
    let limit = limit.unwrap_or(config.max_search_results);
    let found = kb.find_relevant(description, limit);

    if found.is_empty() {
        println!("No matching instructions for \"{description}\".");
        return Ok(());
    }
    for (i, inst) in found.iter().enumerate() {
        print_instruction(i + 1, inst);
    }
    Ok(())
}

fn cmd_equipment(instructions: PathBuf, name: &str) -> repairlog::util::error::Result<()> {
    let kb = query::load_knowledge(&instructions)?;
    let found = kb.for_equipment(name);

    if found.is_empty() {
        println!("No instructions for equipment matching \"{name}\".");
        return Ok(());
    }
    for (i, inst) in found.iter().enumerate() {
        print_instruction(i + 1, inst);
    }
    Ok(())
}

fn cmd_stats(instructions: PathBuf) -> repairlog::util::error::Result<()> {
    let kb = query::load_knowledge(&instructions)?;
    let mut stats: Vec<_> = kb.problem_statistics().into_iter().collect();
    stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!("{} instructions", kb.len());
    for (category, count) in stats {
        println!("  {:<18} {count}", category.label());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "repairlog", "analyze", "log.csv", "-o", "out.csv", "-f", "csv",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze { input, output, format, .. } => {
                assert_eq!(input, PathBuf::from("log.csv"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
                assert_eq!(format, Some(ExportFormat::Csv));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["repairlog", "analyze", "log.csv", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_cli_search_joins_query_words() {
        let cli =
            Cli::try_parse_from(["repairlog", "--debug", "search", "kb.json", "утечка", "азота"])
                .unwrap();
        assert!(cli.debug);
        match cli.command {
            Command::Search { query, .. } => assert_eq!(query.join(" "), "утечка азота"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resolve_output_precedence() {
        let config = AppConfig::default();
        assert_eq!(
            resolve_output(&config, Some(PathBuf::from("x.json")), ExportFormat::Csv),
            PathBuf::from("x.json")
        );
        assert_eq!(
            resolve_output(&config, None, ExportFormat::Csv),
            PathBuf::from("repair_instructions.csv")
        );

        let custom = AppConfig {
            output_path: Some(PathBuf::from("reports/latest.json")),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_output(&custom, None, ExportFormat::Csv),
            PathBuf::from("reports/latest.json")
        );

        // Explicitly configured default name is not renamed.
        let explicit_default = AppConfig {
            output_path: Some(PathBuf::from(constants::DEFAULT_OUTPUT_FILE)),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_output(&explicit_default, None, ExportFormat::Csv),
            PathBuf::from("repair_instructions.json")
        );
    }

    #[test]
    fn test_cli_rejects_out_of_range_separator_and_limit() {
        assert!(
            Cli::try_parse_from(["repairlog", "analyze", "log.csv", "--separator", ""]).is_err()
        );
        assert!(Cli::try_parse_from([
            "repairlog",
            "analyze",
            "log.csv",
            "--separator",
            "12345678901234567",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["repairlog", "search", "kb.json", "шум", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["repairlog", "search", "kb.json", "шум", "-n", "101"]).is_err());
        assert!(Cli::try_parse_from(["repairlog", "search", "kb.json", "шум", "-n", "abc"]).is_err());

        let cli = Cli::try_parse_from(["repairlog", "search", "kb.json", "шум", "-n", "100"]).unwrap();
        match cli.command {
            Command::Search { limit, .. } => assert_eq!(limit, Some(100)),
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from(["repairlog", "analyze", "log.csv", "--separator", " | "]).unwrap();
        match cli.command {
            Command::Analyze { separator, .. } => assert_eq!(separator.as_deref(), Some(" | ")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_exit_codes() {
        let not_found: RepairLogError = IngestError::FileNotFound {
            path: PathBuf::from("x.csv"),
        }
        .into();
        assert_eq!(exit_code_for(&not_found), constants::EXIT_INPUT_NOT_FOUND);
    }
}
