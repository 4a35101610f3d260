use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use lesson_core::model::ModulesIndex;
use services::config::parse_cache_version;
use services::{
    AppServices, CatalogLoader, ClearOutcome, ConfigError, Confirmation, ContentConfig,
    ContentSource, OfflineGateway, ProgressService, QuizEngine,
};
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

const DB_URL_VAR: &str = "LESSONS_DB_URL";
const DEFAULT_DB_URL: &str = "sqlite://lessons.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFile { command: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFile { command } => write!(f, "{command} requires a file path"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    index: ModulesIndex,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn modules_index(&self) -> ModulesIndex {
        self.index.clone()
    }

    fn gateway(&self) -> Arc<OfflineGateway> {
        self.services.gateway()
    }

    fn loader(&self) -> Arc<CatalogLoader> {
        self.services.loader()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn quiz(&self) -> Arc<QuizEngine> {
        self.services.quiz()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [options]");
    eprintln!("  cargo run -p app -- install [options]");
    eprintln!("  cargo run -p app -- export  <file> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- import  <file> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- clear   --yes  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>        default {DEFAULT_DB_URL}");
    eprintln!("  --content <dir|url>      lesson content origin, default ./content");
    eprintln!("  --cache-version <n>      offline cache generation, default 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_URL_VAR}, LESSONS_CONTENT_URL, LESSONS_CACHE_VERSION, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Install,
    Export,
    Import,
    Clear,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "install" => Some(Self::Install),
            "export" => Some(Self::Export),
            "import" => Some(Self::Import),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Install => "install",
            Self::Export => "export",
            Self::Import => "import",
            Self::Clear => "clear",
        }
    }

    fn takes_file(self) -> bool {
        matches!(self, Self::Export | Self::Import)
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    content: ContentConfig,
    file: Option<PathBuf>,
    yes: bool,
}

impl Args {
    fn parse(
        command: Command,
        args: &mut impl Iterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = lookup(DB_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut content = ContentConfig::from_lookup(&lookup)?;
        let mut file = None;
        let mut yes = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--content" => {
                    let value = require_value(args, "--content")?;
                    content.source = ContentSource::parse(&value)?;
                }
                "--cache-version" => {
                    let value = require_value(args, "--cache-version")?;
                    content.cache_version = parse_cache_version(&value)?;
                }
                "--yes" | "-y" if command == Command::Clear => yes = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if command.takes_file() && file.is_none() && !arg.starts_with('-') => {
                    file = Some(PathBuf::from(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if command.takes_file() && file.is_none() {
            return Err(ArgsError::MissingFile {
                command: command.name(),
            });
        }

        Ok(Self {
            db_url,
            content,
            file,
            yes,
        })
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
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
    let parsed = Args::parse(cmd, &mut iter, |name| std::env::var(name).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // sqlx will not create the database file itself.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    match cmd {
        Command::Ui => {
            let services = AppServices::new(
                storage,
                parsed.content.source.network(),
                parsed.content.manifest(),
            )
            .await;
            let state = services.start_offline_cache().await;
            log::info!("offline cache {state:?}");
            let index = services.loader().load_modules_index().await;
            log::info!("loaded {} modules", index.len());

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { index, services });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Offline Lessons")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Install => {
            let services = AppServices::new(
                storage,
                parsed.content.source.network(),
                parsed.content.manifest(),
            )
            .await;
            let state = services.start_offline_cache().await;
            let gateway = services.gateway();
            let keys = gateway.cached_keys().await?;
            println!(
                "{}: {state:?}, {} cached entries",
                gateway.manifest().cache_name(),
                keys.len()
            );
            for key in keys {
                println!("  {key}");
            }
            Ok(())
        }
        Command::Export => {
            let progress = ProgressService::open(Arc::clone(&storage.values)).await;
            let path = parsed.file.unwrap_or_default();
            tokio::fs::write(&path, progress.export_snapshot()?).await?;
            println!("progress exported to {}", path.display());
            Ok(())
        }
        Command::Import => {
            let progress = ProgressService::open(Arc::clone(&storage.values)).await;
            let path = parsed.file.unwrap_or_default();
            let raw = tokio::fs::read_to_string(&path).await?;
            let state = progress.import_snapshot(&raw).await?;
            println!(
                "progress imported from {} ({})",
                path.display(),
                if state.is_empty() { "empty" } else { "non-empty" }
            );
            Ok(())
        }
        Command::Clear => {
            let progress = ProgressService::open(Arc::clone(&storage.values)).await;
            let confirmation = if parsed.yes {
                Confirmation::Confirmed
            } else {
                Confirmation::Declined
            };
            match progress.clear(confirmation).await? {
                ClearOutcome::Cleared => println!("progress cleared"),
                ClearOutcome::Cancelled => {
                    eprintln!("This will erase local progress on this device. Re-run with --yes.");
                }
            }
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
