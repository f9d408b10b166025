use std::{io, path::PathBuf, process};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use env_logger::Env;
use serde_json::json;
use subshift::{Offset, ShiftConfig, ShiftReport};

const CLI_AFTER_HELP: &str = "Offset notation:\n  +HH:MM:SS,MS or DHH:MM:SS,MS   delay (subtitles appear later)\n  -HH:MM:SS,MS or AHH:MM:SS,MS   advance (subtitles appear earlier)\n  SS,MS                          short form, with any of the signs above\n\nExamples:\n  subshift movie.srt -t +00:00:05,000\n  subshift movie.srt -t A02,500 -o movie.synced.srt\n  subshift movie.srt -t -01,000 --dry-run --json\n  subshift --completions zsh > _subshift";

#[derive(Debug, Parser)]
#[command(
    name = "subshift",
    version,
    about = "Shift subtitle timestamps to fix audio/subtitle desynchronization",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path to the subtitle file.
    #[arg(required_unless_present = "completions")]
    file: Option<PathBuf>,

    /// Time adjustment: [+|-]HH:MM:SS,MS or [A|D]HH:MM:SS,MS (SS,MS short form allowed).
    #[arg(
        short,
        long,
        value_name = "EXPR",
        allow_hyphen_values = true,
        required_unless_present = "completions"
    )]
    time: Option<String>,

    /// Output file. Overwrites the input file when omitted.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Show debug logging output.
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn build_config(cli: &Cli) -> Result<ShiftConfig, Box<dyn std::error::Error>> {
    let expression = cli.time.as_deref().ok_or("--time is required")?;
    let offset: Offset = expression.parse()?;

    let mut config = ShiftConfig::new(offset).with_dry_run(cli.dry_run);
    if let Some(output) = &cli.output {
        config = config.with_output(output);
    }
    Ok(config)
}

fn print_report(report: &ShiftReport, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if as_json {
        let payload = json!({
            "input": report.input.display().to_string(),
            "output": report.output.display().to_string(),
            "offset": report.offset.to_string(),
            "offset_ms": report.offset.as_millis(),
            "lines": report.stats.lines,
            "time_ranges": report.stats.time_ranges,
            "clamped": report.stats.clamped,
            "written": report.written,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if report.written {
        println!(
            "{} {}",
            "saved".green().bold(),
            format!(
                "{} ({} time range(s) shifted by {})",
                report.output.display(),
                report.stats.time_ranges,
                report.offset
            )
            .green()
        );
    } else {
        println!(
            "{} {}",
            "dry run:".yellow().bold(),
            format!(
                "{} time range(s) in {} would shift by {}",
                report.stats.time_ranges,
                report.input.display(),
                report.offset
            )
            .yellow()
        );
    }

    if report.stats.clamped > 0 && !as_json {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "{} timestamp(s) clamped to 00:00:00,000",
                report.stats.clamped
            )
            .yellow()
        );
    }

    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "subshift", &mut io::stdout());
        return Ok(());
    }

    let input = cli.file.as_deref().ok_or("input file is required")?;
    let config = build_config(&cli)?;
    log::debug!("Applying offset {} ({} ms)", config.offset, config.offset.as_millis());

    let report = subshift::adjust_with_config(input, &config)?;
    print_report(&report, cli.json)
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::error::ErrorKind as ClapErrorKind;

    use super::{Cli, CommandFactory, Parser, build_config};

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_offset_value() {
        let cli = Cli::try_parse_from(["subshift", "movie.srt", "-t", "-00:00:02,500"]).unwrap();
        assert_eq!(cli.time.as_deref(), Some("-00:00:02,500"));

        let config = build_config(&cli).unwrap();
        assert_eq!(config.offset.as_millis(), -2_500);
        assert_eq!(
            config.output_path(Path::new("movie.srt")),
            Path::new("movie.srt")
        );
    }

    #[test]
    fn parses_output_and_flags() {
        let cli = Cli::try_parse_from([
            "subshift",
            "movie.srt",
            "--time",
            "D05,000",
            "--output",
            "fixed.srt",
            "--dry-run",
            "--json",
        ])
        .unwrap();

        let config = build_config(&cli).unwrap();
        assert_eq!(config.offset.as_millis(), 5_000);
        assert_eq!(
            config.output_path(Path::new("movie.srt")),
            Path::new("fixed.srt")
        );
        assert!(config.dry_run);
        assert!(cli.json);
    }

    #[test]
    fn time_is_required() {
        let error = Cli::try_parse_from(["subshift", "movie.srt"]).unwrap_err();
        assert_eq!(error.kind(), ClapErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn completions_need_no_file() {
        let cli = Cli::try_parse_from(["subshift", "--completions", "bash"]).unwrap();
        assert!(cli.completions.is_some());
        assert!(cli.file.is_none());
    }

    #[test]
    fn help_is_not_a_failure() {
        let error = Cli::try_parse_from(["subshift", "--help"]).unwrap_err();
        assert_eq!(error.kind(), ClapErrorKind::DisplayHelp);
        assert_eq!(error.exit_code(), 0);
    }

    #[test]
    fn malformed_offset_is_rejected() {
        let cli = Cli::try_parse_from(["subshift", "movie.srt", "-t", "xx:yy:zz"]).unwrap();
        let error = build_config(&cli).unwrap_err();
        assert!(error.to_string().contains("xx:yy:zz"), "{error}");
    }
}
