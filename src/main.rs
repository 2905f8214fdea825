use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use syllabus_extract::calendar::{calendar_batch, to_ics};
use syllabus_extract::config::parse_date;
use syllabus_extract::scanner::scan_corpus;
use syllabus_extract::{CourseSchedule, ExtractConfig, MeetingKind, parse_schedule, read_syllabus};

#[derive(Parser)]
#[command(
    name = "syllabus-extract",
    about = "Weekly class schedule extractor for syllabus text"
)]
struct Cli {
    /// JSON config file (defaults apply to missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse one document (or "-" for stdin) and print its schedule as JSON
    Parse { file: PathBuf },
    /// Parse every .txt document under a corpus directory → output/schedules.json
    Extract {
        #[arg(default_value = ".")]
        corpus: PathBuf,
        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print weekly calendar event records for one document
    Events {
        file: PathBuf,
        #[command(flatten)]
        term: TermArgs,
    },
    /// Print an iCalendar export for one document
    Ics {
        file: PathBuf,
        #[command(flatten)]
        term: TermArgs,
    },
}

#[derive(clap::Args)]
struct TermArgs {
    /// First day of the term, YYYY-MM-DD
    #[arg(long)]
    term_start: Option<String>,
    /// Last day of classes, YYYY-MM-DD
    #[arg(long)]
    term_end: Option<String>,
    /// IANA time zone (overrides config)
    #[arg(long)]
    timezone: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ExtractConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    match cli.command {
        Some(Command::Parse { file }) => run_parse(&file, &config),
        Some(Command::Extract { corpus, output }) => {
            let config = ExtractConfig {
                output_dir: output.unwrap_or(config.output_dir.clone()),
                ..config
            };
            run_extract(&corpus, &config)
        }
        Some(Command::Events { file, term }) => run_events(&file, &apply_term(config, term)?),
        Some(Command::Ics { file, term }) => run_ics(&file, &apply_term(config, term)?),
        // Default: extract from current directory
        None => run_extract(Path::new("."), &config),
    }
}

/// Command-line term flags override the config file.
fn apply_term(mut config: ExtractConfig, term: TermArgs) -> Result<ExtractConfig> {
    if let Some(start) = term.term_start {
        config.term_start = Some(parse_date(&start)?);
    }
    if let Some(end) = term.term_end {
        config.term_end = Some(parse_date(&end)?);
    }
    if let Some(tz) = term.timezone {
        config.timezone = tz;
    }
    config.validate()?;
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn write_json<T: Serialize>(dir: &Path, name: &str, data: &T) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&path, &json).with_context(|| format!("cannot write {}", path.display()))?;
    eprintln!("  {} ({} bytes)", path.display(), json.len());
    Ok(())
}

fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn load_schedule(file: &Path, config: &ExtractConfig) -> Result<CourseSchedule> {
    let text = read_syllabus(file, config).with_context(|| format!("cannot read {}", file.display()))?;
    Ok(parse_schedule(&text))
}

// ═══════════════════════════════════════════════════════════════════════
//  SINGLE-DOCUMENT MODES
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(file: &Path, config: &ExtractConfig) -> Result<()> {
    let schedule = load_schedule(file, config)?;
    info!(
        meetings = schedule.meetings.len(),
        course = schedule.course_name.as_deref().unwrap_or("-"),
        "parsed"
    );
    print_json(&schedule)
}

fn run_events(file: &Path, config: &ExtractConfig) -> Result<()> {
    let schedule = load_schedule(file, config)?;
    let batch = calendar_batch(&schedule, config)?;
    print_json(&batch)
}

fn run_ics(file: &Path, config: &ExtractConfig) -> Result<()> {
    let schedule = load_schedule(file, config)?;
    let stamp = chrono::Utc::now().naive_utc();
    print!("{}", to_ics(&schedule, config, stamp)?);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: corpus → output/schedules.json
// ═══════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct DocumentSchedule {
    file: PathBuf,
    schedule: CourseSchedule,
}

#[derive(Default)]
struct ExtractStats {
    documents: usize,
    failed: usize,
    unnamed: usize,
    class: usize,
    lab: usize,
    discussion: usize,
    office: usize,
}

impl ExtractStats {
    fn record(&mut self, schedule: &CourseSchedule) {
        self.documents += 1;
        if schedule.course_name.is_none() {
            self.unnamed += 1;
        }
        for m in &schedule.meetings {
            match m.kind {
                MeetingKind::Class => self.class += 1,
                MeetingKind::Lab => self.lab += 1,
                MeetingKind::Discussion => self.discussion += 1,
                MeetingKind::Office => self.office += 1,
            }
        }
    }

    fn meetings(&self) -> usize {
        self.class + self.lab + self.discussion + self.office
    }
}

fn run_extract(corpus: &Path, config: &ExtractConfig) -> Result<()> {
    eprintln!("Scanning corpus at {}", corpus.display());
    let files = scan_corpus(corpus);
    eprintln!("Found {} syllabus files", files.len());

    let mut stats = ExtractStats::default();
    let mut results = Vec::with_capacity(files.len());

    for file in &files {
        let text = match read_syllabus(&file.path, config) {
            Ok(t) => t,
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "skipping document");
                stats.failed += 1;
                continue;
            }
        };
        let schedule = parse_schedule(&text);
        stats.record(&schedule);
        results.push(DocumentSchedule {
            file: file.path.clone(),
            schedule,
        });
    }

    eprintln!("\nWriting output to {}/", config.output_dir.display());
    write_json(&config.output_dir, "schedules.json", &results)?;

    eprintln!("\n── Statistics ──");
    eprintln!("  Documents parsed:       {}", stats.documents);
    eprintln!("  Documents skipped:      {}", stats.failed);
    eprintln!("  Without course name:    {}", stats.unnamed);
    eprintln!("  Meetings:               {}", stats.meetings());
    eprintln!("    CLASS:                {}", stats.class);
    eprintln!("    LAB:                  {}", stats.lab);
    eprintln!("    DISCUSSION:           {}", stats.discussion);
    eprintln!("    OFFICE:               {}", stats.office);

    Ok(())
}
