//! CLI binary for docanalyzer.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalyzerConfig`, prints notifications as they arrive and writes the
//! rendered analysis to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use docanalyzer::{
    render_report, AnalysisPhase, AnalyzerConfig, Notification, NotificationKind,
    NotificationSink, SelectedFile, Session,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

// ── CLI notification sink using indicatif ────────────────────────────────────

/// Terminal sink: prints each notification as a coloured line and shows a
/// spinner while a request is in flight.
struct CliNotifier {
    spinner: Mutex<Option<ProgressBar>>,
    show_spinner: bool,
}

impl CliNotifier {
    fn new(show_spinner: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_spinner,
        })
    }

    fn start_spinner(&self, message: &'static str) {
        if !self.show_spinner {
            return;
        }
        let mut slot = self.spinner.lock().unwrap();
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        bar.set_prefix(message);
        bar.set_message("please wait…");
    }

    fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl NotificationSink for CliNotifier {
    fn notify(&self, notification: &Notification) {
        let line = match notification.kind {
            NotificationKind::Success => format!("{} {}", green("✔"), notification.message),
            NotificationKind::Error => format!("{} {}", red("✘"), red(&notification.message)),
        };
        match self.spinner.lock().unwrap().as_ref() {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }

    fn on_phase_change(&self, _from: AnalysisPhase, to: AnalysisPhase) {
        match to {
            AnalysisPhase::Uploading => self.start_spinner("Uploading"),
            AnalysisPhase::Analyzing => self.start_spinner("Analyzing"),
            _ => self.stop_spinner(),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a document with the hosted backend
  docanalyzer report.pdf

  # Use a local backend
  docanalyzer --base-url http://localhost:5000 notes.docx

  # Raw JSON of the analysis response
  docanalyzer --json report.pdf > analysis.json

  # Force the MIME type sent with the upload
  docanalyzer --mime application/pdf scan.bin

ENVIRONMENT VARIABLES:
  DOCANALYZER_BASE_URL         Backend base URL
  DOCANALYZER_UPLOAD_TIMEOUT   Upload timeout in seconds
  DOCANALYZER_ANALYZE_TIMEOUT  Analyze timeout in seconds
  DOCANALYZER_MIME             MIME type sent with the upload
  DOCANALYZER_JSON             Print raw JSON (true/false)
  DOCANALYZER_NO_PROGRESS      Disable the spinner (true/false)
  DOCANALYZER_VERBOSE          DEBUG-level logs (true/false)
  DOCANALYZER_QUIET            Suppress notifications (true/false)
  RUST_LOG                     Override the log filter
"#;

/// Upload a document for text extraction and AI analysis.
#[derive(Parser, Debug)]
#[command(
    name = "docanalyzer",
    version,
    about = "Upload a document for text extraction and AI analysis",
    long_about = "Upload a document to the DocAnalyzer backend, which extracts its text, \
then have the text analysed (summary, entities, sentiment, narrative) and print the result.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to upload.
    file: PathBuf,

    /// Backend base URL.
    #[arg(long, env = "DOCANALYZER_BASE_URL", default_value = docanalyzer::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// MIME type to send instead of the one guessed from the extension.
    #[arg(long, env = "DOCANALYZER_MIME")]
    mime: Option<String>,

    /// Upload request timeout in seconds.
    #[arg(long, env = "DOCANALYZER_UPLOAD_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    upload_timeout: u64,

    /// Analyze request timeout in seconds.
    #[arg(long, env = "DOCANALYZER_ANALYZE_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    analyze_timeout: u64,

    /// Print the raw analysis JSON instead of the formatted report.
    #[arg(long, env = "DOCANALYZER_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "DOCANALYZER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCANALYZER_VERBOSE")]
    verbose: bool,

    /// Suppress notifications; only the result (or errors) is printed.
    #[arg(short, long, env = "DOCANALYZER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Keep library INFO logs out of the way while the spinner is active;
    // the notifications carry everything the user needs.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = AnalyzerConfig::builder()
        .base_url(cli.base_url.clone())
        .upload_timeout_secs(cli.upload_timeout)
        .analyze_timeout_secs(cli.analyze_timeout);
    if !cli.quiet {
        builder = builder.notification_sink(CliNotifier::new(show_progress));
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Select ───────────────────────────────────────────────────────────
    let mut session = Session::new(config).context("Failed to start session")?;
    let file = docanalyzer::pipeline::input::load_path(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let file: SelectedFile = match cli.mime {
        Some(ref mime) => file.with_mime(mime.clone()),
        None => file,
    };
    session.select_file(file)?;

    // ── Run cycle ────────────────────────────────────────────────────────
    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let result = match session.upload().await {
        Ok(result) => result,
        Err(e) => {
            // The sink already showed the failure unless we are quiet.
            if cli.quiet {
                eprintln!("{} {}", red("✘"), e);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json =
            serde_json::to_string_pretty(result.raw()).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        handle
            .write_all(render_report(&result).as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(ExitCode::SUCCESS)
}
