use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::QuizConfig;
use quiz_core::model::ClassLevel;
use services::{
    AppServices, CatalogSource, Clock, LaunchOptions, PreferencesService, QuizLoopService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, DesktopFileOpener, FileOpenerRef, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidClass { raw: String },
    InvalidQuestionCount { raw: String },
    InvalidCatalogUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidClass { raw } => {
                write!(f, "invalid class: {raw} (expected 5-12 or \"default\")")
            }
            ArgsError::InvalidQuestionCount { raw } => {
                write!(f, "invalid --questions value: {raw}")
            }
            ArgsError::InvalidCatalogUrl { raw } => write!(f, "invalid catalog URL: {raw}"),
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

struct DesktopApp {
    services: AppServices,
    export_dir: PathBuf,
    file_opener: FileOpenerRef,
}

impl UiApp for DesktopApp {
    fn initial_class(&self) -> ClassLevel {
        self.services.initial_class()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }

    fn file_opener(&self) -> FileOpenerRef {
        Arc::clone(&self.file_opener)
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    catalog_source: Option<CatalogSource>,
    class_level: Option<ClassLevel>,
    question_count: Option<u32>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  formula-quiz ui   [options]   # default");
    eprintln!("  formula-quiz pool [options]   # print question pool statistics");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         default sqlite:formula-quiz.sqlite3");
    eprintln!("  --catalog-dir <path>      read <path>/<class>.json");
    eprintln!("  --catalog-url <base_url>  fetch <base_url>/<class>.json");
    eprintln!("  --class <5-12|default>    class to start with");
    eprintln!("  --questions <n>           questions per session (default 30)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FORMULA_QUIZ_DB_URL, FORMULA_QUIZ_CATALOG_DIR, FORMULA_QUIZ_CATALOG_URL,");
    eprintln!("  FORMULA_QUIZ_CLASS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Pool,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "pool" => Some(Self::Pool),
            _ => None,
        }
    }
}

fn parse_class(raw: String) -> Result<ClassLevel, ArgsError> {
    raw.trim()
        .parse::<ClassLevel>()
        .map_err(|_| ArgsError::InvalidClass { raw })
}

fn parse_catalog_url(raw: String) -> Result<CatalogSource, ArgsError> {
    CatalogSource::http(raw.trim()).map_err(|_| ArgsError::InvalidCatalogUrl { raw })
}

impl Args {
    /// Environment values first; flags override them. When both a catalog
    /// directory and URL are given, the last one wins.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("FORMULA_QUIZ_DB_URL")
            .map_or_else(|| "sqlite://formula-quiz.sqlite3".into(), normalize_sqlite_url);
        let mut catalog_source = match (
            env("FORMULA_QUIZ_CATALOG_URL"),
            env("FORMULA_QUIZ_CATALOG_DIR"),
        ) {
            (Some(url), _) => Some(parse_catalog_url(url)?),
            (None, Some(dir)) => Some(CatalogSource::Directory(PathBuf::from(dir))),
            (None, None) => None,
        };
        let mut class_level = env("FORMULA_QUIZ_CLASS").map(parse_class).transpose()?;
        let mut question_count = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog-dir" => {
                    let value = require_value(args, "--catalog-dir")?;
                    catalog_source = Some(CatalogSource::Directory(PathBuf::from(value)));
                }
                "--catalog-url" => {
                    let value = require_value(args, "--catalog-url")?;
                    catalog_source = Some(parse_catalog_url(value)?);
                }
                "--class" => {
                    class_level = Some(parse_class(require_value(args, "--class")?)?);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let parsed = value
                        .parse::<u32>()
                        .ok()
                        .filter(|count| *count > 0)
                        .ok_or(ArgsError::InvalidQuestionCount { raw: value })?;
                    question_count = Some(parsed);
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
            catalog_source,
            class_level,
            question_count,
        })
    }

    fn quiz_config(&self) -> Result<QuizConfig, quiz_core::Error> {
        let config = QuizConfig::standard();
        match self.question_count {
            Some(count) => Ok(config.with_question_count(count)?),
            None => Ok(config),
        }
    }

    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            catalog_source: self.catalog_source.clone(),
            class_level: self.class_level,
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::system(),
        parsed.quiz_config()?,
        parsed.launch_options(),
    )
    .await?;

    match cmd {
        Command::Ui => {
            let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            info!(
                class = %services.initial_class(),
                source = ?services.quiz_loop().catalogs().source(),
                "launching quiz"
            );
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                export_dir,
                file_opener: Arc::new(DesktopFileOpener),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Physics Formula Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Pool => {
            let quiz_loop = services.quiz_loop();
            let loaded = quiz_loop.load_catalog(services.initial_class()).await?;
            println!("class:          {}", loaded.class_level);
            if let Some(standard) = loaded.catalog.standard() {
                println!("standard:       {standard}");
            }
            if let Some(board) = loaded.catalog.board() {
                println!("board:          {board}");
            }
            if let Some(notes) = loaded.catalog.notes() {
                println!("notes:          {notes}");
            }
            for source in loaded.catalog.sources() {
                println!("source:         {source}");
            }
            println!("chapters:       {}", loaded.catalog.chapters().len());
            println!("formulas:       {}", loaded.catalog.formula_count());
            println!("identify:       {}", loaded.stats.identify_formula);
            println!("term meaning:   {}", loaded.stats.term_meaning);
            println!("pool size:      {}", loaded.pool.len());
            println!(
                "session length: {}",
                quiz_loop.plan(&loaded).total()
            );
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
