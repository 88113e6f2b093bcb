use std::fmt;

use defenzo_core::model::{CourseId, LessonId, NewsCategory};
use services::{AppServices, Clock, ToolsServiceError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { what: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid id: {raw}"),
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
    eprintln!("  cargo run -p app -- <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  dashboard                          security score and breakdown");
    eprintln!("  courses                            list stored courses");
    eprintln!("  course <id>                        show one course with lessons");
    eprintln!("  complete-lesson <course> <lesson>  mark a lesson done");
    eprintln!("  refresh                            pull catalog and progress from the API");
    eprintln!("  badges                             achievements by category");
    eprintln!("  news [threats|tips|trends]         the news feed");
    eprintln!("  scan <url>                         run a URL reputation scan");
    eprintln!("  password-check <password>          check password strength");
    eprintln!("  register <email> <password> <name> create an account and log in");
    eprintln!("  login <email> <password>           log in");
    eprintln!("  logout                             drop the stored session");
    eprintln!("  profile                            show the account profile");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   default sqlite:defenzo.sqlite3");
    eprintln!("  --api <base_url>    default http://localhost:8080");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DEFENZO_DB_URL, DEFENZO_API_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Courses,
    Course,
    CompleteLesson,
    Refresh,
    Badges,
    News,
    Scan,
    PasswordCheck,
    Register,
    Login,
    Logout,
    Profile,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "courses" => Some(Self::Courses),
            "course" => Some(Self::Course),
            "complete-lesson" => Some(Self::CompleteLesson),
            "refresh" => Some(Self::Refresh),
            "badges" => Some(Self::Badges),
            "news" => Some(Self::News),
            "scan" => Some(Self::Scan),
            "password-check" => Some(Self::PasswordCheck),
            "register" => Some(Self::Register),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    api_url: String,
    operands: Vec<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("DEFENZO_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://defenzo.sqlite3".into(), normalize_sqlite_url);
        let mut api_url =
            std::env::var("DEFENZO_API_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        let mut operands = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    api_url = require_value(args, "--api")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => operands.push(arg),
            }
        }

        Ok(Self {
            db_url,
            api_url,
            operands,
        })
    }

    fn operand(&self, index: usize, what: &'static str) -> Result<&str, ArgsError> {
        self.operands
            .get(index)
            .map(String::as_str)
            .ok_or(ArgsError::MissingOperand { what })
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

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
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

fn course_id(raw: &str) -> Result<CourseId, ArgsError> {
    CourseId::new(raw).map_err(|_| ArgsError::InvalidId { raw: raw.to_owned() })
}

fn lesson_id(raw: &str) -> Result<LessonId, ArgsError> {
    LessonId::new(raw).map_err(|_| ArgsError::InvalidId { raw: raw.to_owned() })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let services =
        AppServices::new_sqlite(&args.db_url, &args.api_url, Clock::default_clock()).await?;

    match cmd {
        Command::Dashboard => {
            let details = services.security().dashboard().await?;
            println!("Security score: {} ({})", details.overall, details.status.label());
            println!("  Courses:   {}%", details.metrics.courses_progress);
            println!("  Quizzes:   {}%", details.metrics.quiz_results);
            println!("  Practical: {}%", details.metrics.practical_tasks);
        }
        Command::Courses => {
            for course in services.courses().list().await? {
                println!(
                    "{}  {} [{}] {}%",
                    course.id(),
                    course.title(),
                    course.level(),
                    course.progress()
                );
            }
        }
        Command::Course => {
            let id = course_id(args.operand(0, "course id")?)?;
            let course = services.courses().course(&id).await?;
            println!("{} ({}, {})", course.title(), course.level(), course.duration());
            println!("{}", course.description());
            println!("Progress: {}%", course.progress());
            for lesson in course.lessons() {
                let mark = if lesson.completed() { "x" } else { " " };
                println!(
                    "  [{mark}] {}  {} ({}, {})",
                    lesson.id(),
                    lesson.title(),
                    lesson.lesson_type().as_str(),
                    lesson.duration()
                );
            }
        }
        Command::CompleteLesson => {
            let course = course_id(args.operand(0, "course id")?)?;
            let lesson = lesson_id(args.operand(1, "lesson id")?)?;
            let progress = services.courses().complete_lesson(&course, &lesson).await?;
            println!("{course}: {progress}% complete");
        }
        Command::Refresh => {
            let courses = services.courses().refresh().await?;
            let badges = services.badges().refresh().await?;
            println!("{} courses, {} badges", courses.len(), badges.len());
        }
        Command::Badges => {
            for group in services.badges().grouped().await? {
                println!("{}:", group.category.title());
                for entry in &group.badges {
                    let badge = entry.badge();
                    let state = if entry.completed() {
                        "earned".to_owned()
                    } else {
                        format!("{}%", entry.progress())
                    };
                    println!("  {} {}  {} ({state})", badge.icon, badge.name, badge.description);
                }
            }
        }
        Command::News => {
            let category = match args.operands.first() {
                Some(raw) => Some(raw.parse::<NewsCategory>()?),
                None => None,
            };
            for article in services.news().articles(category).await? {
                println!(
                    "[{}] {} - {} ({})",
                    article.category, article.title, article.date, article.read_time
                );
                println!("    {}", article.summary);
            }
        }
        Command::Scan => {
            let result = services.tools().scan_url(args.operand(0, "url")?).await?;
            println!("{}: {}", result.url, result.status);
            if let Some(details) = &result.details {
                println!(
                    "  {}/{} engines flagged it",
                    details.positive_scans, details.total_scans
                );
            }
            if let Some(error) = &result.error {
                println!("  error: {error}");
            }
        }
        Command::PasswordCheck => {
            let password = args.operand(0, "password")?;
            let tools = services.tools();
            match tools.check_password(password).await {
                Ok(result) => print_password_report(result.score, &result.label, &result.suggestions),
                Err(ToolsServiceError::Api(err)) => {
                    tracing::debug!(error = %err, "server check unavailable, using local rules");
                    let report = tools.check_password_offline(password);
                    print_password_report(report.score, report.label.as_str(), &report.suggestions);
                }
                Err(other) => return Err(other.into()),
            }
        }
        Command::Register => {
            let email = args.operand(0, "email")?;
            let password = args.operand(1, "password")?;
            let name = args.operand(2, "full name")?;
            services.auth().register(email, password, name).await?;
            println!("registered and logged in as {email}");
        }
        Command::Login => {
            let email = args.operand(0, "email")?;
            services
                .auth()
                .login(email, args.operand(1, "password")?)
                .await?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            services.auth().logout().await?;
            println!("logged out");
        }
        Command::Profile => {
            let profile = services.auth().profile().await?;
            println!("{} <{}>", profile.full_name, profile.email);
            if let Some(url) = &profile.profile_picture_url {
                println!("picture: {url}");
            }
        }
    }

    Ok(())
}

fn print_password_report(score: u8, label: &str, suggestions: &[String]) {
    println!("{label} ({score}/{})", defenzo_core::password::MAX_SCORE);
    for suggestion in suggestions {
        println!("  - {suggestion}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
