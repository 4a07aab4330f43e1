use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::AttemptPhase;
use quiz_core::model::{SubjectId, TestId, TestKind};
use services::{AppServices, QuizEvent, QuizFlow, Screen};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play]    [--db <sqlite_url>] [--content <dir>] [--seed <u64>]");
    eprintln!("  quiz progress  [--db <sqlite_url>] [--content <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --content ./content");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CONTENT_DIR, QUIZ_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Progress,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    content_dir: PathBuf,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| database_url("quiz.sqlite3"), |value| database_url(&value));
        let mut content_dir = std::env::var("QUIZ_CONTENT_DIR")
            .ok()
            .map_or_else(|| PathBuf::from("content"), PathBuf::from);
        let mut seed = std::env::var("QUIZ_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = database_url(&value);
                }
                "--content" => {
                    content_dir = PathBuf::from(require_value(args, "--content")?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            content_dir,
            seed,
        })
    }
}

/// Resolve a `--db` value to a `sqlite://` URL with an absolute file path.
///
/// Accepts a full `sqlite://` URL, a `sqlite:` prefixed path or a bare path.
fn database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("sqlite://") {
        return raw.to_string();
    }
    let file = Path::new(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let file = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(file)
    };
    format!("sqlite://{}", file.display())
}

/// Create the directory the progress database lives in. The file itself is
/// created when storage connects.
fn ensure_database_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = db_url
        .strip_prefix("sqlite://")
        .and_then(|rest| rest.split('?').next())
        .filter(|file| !file.is_empty())
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    if let Some(dir) = Path::new(file).parent() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

//
// ─── TERMINAL RENDERING ────────────────────────────────────────────────────────
//

fn render(flow: &QuizFlow) {
    match flow.screen() {
        Screen::Subjects => {
            println!("\nChoose a subject (q to quit):");
            for (i, subject) in flow.catalog().subjects().enumerate() {
                println!("  {}. {} ({} questions)", i + 1, subject.title(), subject.questions().len());
            }
        }
        Screen::Tests { subject } => {
            let title = flow.catalog().subject(subject).map_or("", |s| s.title());
            println!("\n{title}: choose a test by number (b to go back):");
            for line in flow.test_summaries().unwrap_or_default() {
                let mark = if line.passed { "✔" } else { "○" };
                println!(
                    "  {:>2}. {:<20} {:>3} questions  best {}/{} {mark}",
                    line.test_id.value(), line.title, line.question_count, line.best_score, line.total
                );
            }
        }
        Screen::Quiz { .. } => {
            let Some(view) = flow.attempt_view() else {
                return;
            };
            let pass = match view.kind {
                quiz_core::AttemptKind::Main => "Main pass",
                quiz_core::AttemptKind::MistakesRetry => "Mistakes retry",
            };
            println!("\n{pass} - question {}/{} (x to exit)", view.position, view.len);
            println!("{}", view.question.question);
            for (i, option) in view.question.options.iter().enumerate() {
                println!("  {}. {option}", i + 1);
            }
            if let Some(feedback) = &view.feedback {
                let verdict = if feedback.is_correct { "Correct" } else { "Wrong" };
                println!("{verdict}. Correct answer: {}", feedback.correct_answer);
                let hint = if view.is_last { "finish" } else { "next question" };
                println!("Press Enter for {hint}.");
            }
        }
        Screen::Result { .. } => {
            let Some(result) = flow.result_summary() else {
                return;
            };
            println!("\n{}: {}/{}", result.test_title, result.final_correct, result.total);
            if result.passed {
                println!("✔ Passed");
            }
            if result.is_random {
                for (i, entry) in result.review_log.iter().enumerate() {
                    let verdict = if entry.is_correct { "correct" } else { "wrong" };
                    println!("  {}. {} - {verdict}", i + 1, entry.question.question);
                    if !entry.is_correct {
                        println!("     correct answer: {}", entry.question.correct_answer);
                    }
                }
            } else if result.can_retry_mistakes {
                println!("Mistakes in the main pass: {} (r to retry them)", result.mistakes.len());
            }
            println!("f to finish and save, b to leave without saving");
        }
    }
}

/// Translate one input line into an event for the current screen.
fn parse_input(flow: &QuizFlow, line: &str) -> Option<QuizEvent> {
    let input = line.trim();
    let number = input.parse::<usize>().ok();
    match flow.screen() {
        Screen::Subjects => {
            let index = number?.checked_sub(1)?;
            let subject = flow.catalog().subjects().nth(index)?;
            Some(QuizEvent::ChooseSubject(SubjectId::clone(subject.id())))
        }
        Screen::Tests { .. } => match input {
            "b" => Some(QuizEvent::Back),
            _ => input.parse::<TestId>().ok().map(QuizEvent::ChooseTest),
        },
        Screen::Quiz { .. } => {
            if input == "x" {
                return Some(QuizEvent::ExitAttempt);
            }
            let view = flow.attempt_view()?;
            match view.phase {
                AttemptPhase::Revealed => Some(QuizEvent::Advance),
                _ => {
                    let option = view.question.options.get(number?.checked_sub(1)?)?;
                    Some(QuizEvent::SelectOption(option.clone()))
                }
            }
        }
        Screen::Result { .. } => match input {
            "r" => Some(QuizEvent::StartMistakesRetry),
            "f" => Some(QuizEvent::FinishSession),
            "b" => Some(QuizEvent::Back),
            _ => None,
        },
    }
}

async fn play(mut flow: QuizFlow) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&flow);

    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" && matches!(flow.screen(), Screen::Subjects) {
            break;
        }
        let Some(event) = parse_input(&flow, &line) else {
            println!("?");
            continue;
        };

        let submit = matches!(event, QuizEvent::SelectOption(_));
        if let Err(err) = flow.handle(event).await {
            println!("{err}");
            continue;
        }
        // Choosing an option answers immediately in the terminal.
        if submit {
            if let Err(err) = flow.handle(QuizEvent::SubmitAnswer).await {
                println!("{err}");
            }
        }
        render(&flow);
    }
    Ok(())
}

fn print_progress(flow: &QuizFlow) {
    for subject in flow.catalog().subjects() {
        println!("{}", subject.title());
        let tests = flow.catalog().tests(subject.id()).unwrap_or_default();
        for line in flow.progress().test_summaries(subject.id(), tests) {
            let kind = match line.kind {
                TestKind::Main => "",
                TestKind::Random => " (random)",
            };
            println!(
                "  test {:>2}{kind}: best {}/{}{}",
                line.test_id.value(),
                line.best_score,
                line.total,
                if line.passed { " passed" } else { "" }
            );
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    ensure_database_dir(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, &parsed.content_dir).await?;
    let flow = services.quiz_flow(parsed.seed).await;
    tracing::info!(db = %parsed.db_url, command = ?cmd, "quiz ready");

    match cmd {
        Command::Play => play(flow).await,
        Command::Progress => {
            print_progress(&flow);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
