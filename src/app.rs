//! Application flow: choose a directory, scan it in the background, present
//! the pairs, and move the disposable copies to the trash on confirmation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::actions::{check_eligible, dispose, DisposeConfig, SystemTrash, TrashCapability};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, ScanResult, ScanSummary};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::{DisposeProgress, Progress, ProgressCallback, PHASE_COMPARE, PHASE_WALK};
use crate::signal::{install_handler, CancellationToken};
use crate::worker::{start_scan, ScanEvent, WorkerError};

/// Message shown when no usable directory was given or entered.
pub const NO_DIRECTORY_MESSAGE: &str = "No valid directory selected";

/// Run the application against the real terminal and system trash.
///
/// # Errors
///
/// Returns an error for unexpected failures (bad configuration, I/O errors
/// writing results, a worker that could not start).
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    run_with(cli, &mut input, &mut output, &SystemTrash)
}

/// Run the application with explicit terminal streams and trash.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with<R, W, T>(cli: Cli, input: &mut R, out: &mut W, trash: &T) -> Result<ExitCode>
where
    R: BufRead,
    W: Write,
    T: TrashCapability + ?Sized,
{
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let config = Config::from_cli(&cli).context("Failed to load configuration")?;
    let interactive = config.output == OutputFormat::Text;
    let show_progress = interactive && !cli.quiet;

    let token = install_handler().unwrap_or_else(|e| {
        log::warn!("{}; Ctrl+C will not stop the scan cleanly", e);
        CancellationToken::new()
    });

    let root = match cli.path.clone() {
        Some(path) => Some(path),
        None if interactive => prompt_directory(input, out)?,
        None => None,
    };
    let Some(root) = root.filter(|r| match DuplicateFinder::validate_root(r) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }) else {
        eprintln!("{}", NO_DIRECTORY_MESSAGE.red());
        return Ok(ExitCode::NoDirectory);
    };

    let (mut result, summary) = scan(root, &config, &token, show_progress)?;

    let scan_code = if summary.interrupted {
        ExitCode::Interrupted
    } else if result.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    match config.output {
        OutputFormat::Text => TextOutput::new(&result, &summary).write_to(out)?,
        OutputFormat::Json => JsonOutput::new(&result, &summary, scan_code)
            .write_to(out, true)
            .context("Failed to write JSON output")?,
        OutputFormat::Csv => CsvOutput::new(&result)
            .write_to(&mut *out)
            .context("Failed to write CSV output")?,
    }

    if scan_code != ExitCode::Success {
        return Ok(scan_code);
    }

    if config.dry_run {
        report_dry_run(&result, out, interactive)?;
        return Ok(ExitCode::Success);
    }

    let confirmed = if cli.yes {
        true
    } else if interactive {
        confirm(input, out, "Move to trash? [y/N] ")?
    } else {
        false
    };
    if !confirmed {
        log::info!("Nothing moved to trash");
        return Ok(ExitCode::Success);
    }

    let progress = DisposeProgress::new(result.len(), !show_progress);
    let dispose_config = DisposeConfig::default().with_shutdown_flag(token.flag());
    let report = dispose(&mut result, trash, &dispose_config, Some(&progress));

    if interactive {
        writeln!(out, "{}", report.summary().bold())?;
    }

    Ok(if report.interrupted {
        ExitCode::Interrupted
    } else if report.all_succeeded() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}

/// Run the detection worker and mirror its events onto the terminal.
fn scan(
    root: PathBuf,
    config: &Config,
    token: &CancellationToken,
    show_progress: bool,
) -> Result<(ScanResult, ScanSummary)> {
    let finder_config = config.finder_config().with_shutdown_flag(token.flag());
    let handle = start_scan(root, finder_config).context("Failed to start scan worker")?;
    let progress = Progress::new(!show_progress);

    let outcome = handle.wait(|event| match event {
        ScanEvent::Started { root } => {
            progress.on_phase_start(PHASE_WALK, 0);
            progress.on_message(&format!("Walking {}", root.display()));
        }
        ScanEvent::Discovered { files } => progress.on_progress(*files, ""),
        ScanEvent::Comparing { total } => {
            progress.on_phase_end(PHASE_WALK);
            progress.on_phase_start(PHASE_COMPARE, *total);
        }
        ScanEvent::Progress { processed, .. } => progress.on_progress(*processed, ""),
        ScanEvent::PairFound(pair) => progress.on_pair_found(pair),
        ScanEvent::Finished(_) | ScanEvent::Failed(_) => {
            progress.on_phase_end(PHASE_WALK);
            progress.on_phase_end(PHASE_COMPARE);
        }
    });

    match outcome {
        Ok(found) => Ok(found),
        Err(WorkerError::Finder(e)) => Err(e).context("Scan could not start"),
        Err(e) => Err(e.into()),
    }
}

/// Ask for the directory to scan. An empty answer or end of input is `None`.
///
/// # Errors
///
/// Returns any I/O error from the terminal streams.
pub fn prompt_directory<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<PathBuf>> {
    write!(out, "Directory to scan: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

/// Ask a yes/no question. Only `y` or `yes` (any case) confirm.
///
/// # Errors
///
/// Returns any I/O error from the terminal streams.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn report_dry_run<W: Write>(result: &ScanResult, out: &mut W, interactive: bool) -> io::Result<()> {
    let mut eligible = 0;
    for pair in result {
        match check_eligible(&pair.dispose) {
            Ok(_) => eligible += 1,
            Err(e) => log::warn!("Would skip {}", e),
        }
    }

    let message = format!(
        "Dry run: {eligible} of {} duplicate file(s) would be moved to trash",
        result.len()
    );
    if interactive {
        writeln!(out, "{message}")?;
    } else {
        log::info!("{}", message);
    }
    Ok(())
}
