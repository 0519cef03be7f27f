use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use client::app::App;
use client::config::{ClientConfig, ConfigError};
use client::net::api::ApiError;
use client::pages::FormOutcome;
use client::pages::landing::LandingPage;
use client::pages::signup::SignupForm;
use client::router::{Navigation, View};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
    #[error("{from} requires a signed-in session; redirected to {to}")]
    Redirected { from: View, to: View },
    #[error("no view at path `{0}`")]
    NotFound(String),
    #[error("{0}")]
    Field(String),
    #[error("{0} failed")]
    ActionFailed(&'static str),
    #[error("unterminated quote in input")]
    UnterminatedQuote,
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "journalmind", about = "JournalMind session client")]
struct Cli {
    #[arg(long, env = "JOURNALMIND_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "JOURNALMIND_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// One line typed at the `shell` prompt.
#[derive(Parser, Debug)]
#[command(name = "journalmind", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API is reachable.
    Ping,
    /// Show the session state and current view.
    Status,
    Login {
        user_name: String,
        #[arg(long, env = "JOURNALMIND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signup {
        user_name: String,
        email: String,
        #[arg(long, env = "JOURNALMIND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    CheckUsername {
        user_name: String,
    },
    Logout,
    /// Navigate to a view by path, e.g. `/settings`.
    Open {
        path: String,
    },
    Greet,
    Journal(JournalCommand),
    Profile(ProfileCommand),
    /// Read commands from stdin within one session.
    Shell,
}

#[derive(Args, Debug)]
struct JournalCommand {
    #[command(subcommand)]
    command: JournalSubcommand,
}

#[derive(Subcommand, Debug)]
enum JournalSubcommand {
    List,
    Create {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Update {
        id: String,
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Email {
        email: String,
    },
    Password {
        new_password: String,
        confirm_password: String,
    },
    Delete,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    tracing::debug!(api_url = %config.api_url, storage_dir = %config.storage_dir.display(), "config loaded");

    let mut app = App::from_config(&config)?;
    match cli.command {
        Command::Shell => run_shell(&mut app).await,
        command => run(&mut app, command).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn run(app: &mut App, command: Command) -> Result<(), CliError> {
    let result = dispatch(app, command).await;
    print_notice(app);
    result
}

async fn dispatch(app: &mut App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => {
            println!("{}", app.health_check().await?);
            Ok(())
        }
        Command::Status => {
            run_status(app);
            Ok(())
        }
        Command::Login { user_name, password } => {
            app.open(View::Login);
            let next = app.login_page().submit(&user_name, &password).await;
            follow(app, next, "login")
        }
        Command::Signup { user_name, email, password } => {
            app.open(View::Signup);
            let form = SignupForm { user_name, email, password };
            match app.signup_page().submit(&form).await {
                Ok(next) => follow(app, next, "signup"),
                Err(errors) => Err(CliError::Field(errors.messages().join("; "))),
            }
        }
        Command::CheckUsername { user_name } => {
            let answer = match app.signup_page().check_username(&user_name).await {
                Some(true) => "available",
                Some(false) => "taken",
                None => "unknown",
            };
            println!("{answer}");
            Ok(())
        }
        Command::Logout => {
            app.logout();
            Ok(())
        }
        Command::Open { path } => run_open(app, &path),
        Command::Greet => {
            enter(app, View::Dashboard)?;
            println!("{}", app.dashboard_page().greeting().await);
            Ok(())
        }
        Command::Journal(journal) => run_journal(app, journal).await,
        Command::Profile(profile) => run_profile(app, profile).await,
        Command::Shell => {
            eprintln!("already in a shell");
            Ok(())
        }
    }
}

fn run_status(app: &App) {
    let state = if app.auth().is_authenticated() { "authenticated" } else { "anonymous" };
    println!("session: {state}");
    println!("api: {}", app.api().base_url());
    println!("view: {}", app.current_view());
    let links: Vec<String> = app.navbar().links().into_iter().map(|v| v.path().to_owned()).collect();
    println!("links: {}", links.join(" "));
}

fn run_open(app: &mut App, path: &str) -> Result<(), CliError> {
    match app.navigate(path) {
        Navigation::Render(view) => {
            if view == View::Landing {
                print!("{}", LandingPage::render(app.auth().is_authenticated()));
            } else {
                println!("{} ({view})", view.title());
            }
            Ok(())
        }
        Navigation::Redirect { from, to } => Err(CliError::Redirected { from, to }),
        Navigation::NotFound(path) => Err(CliError::NotFound(path)),
    }
}

async fn run_journal(app: &mut App, journal: JournalCommand) -> Result<(), CliError> {
    enter(app, View::Dashboard)?;
    let page = app.dashboard_page();
    let saved = match journal.command {
        JournalSubcommand::List => {
            let entries = page.entries().await.ok_or(CliError::ActionFailed("journal list"))?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }
        JournalSubcommand::Create { title, content } => page.create_entry(&title, &content).await,
        JournalSubcommand::Update { id, title, content } => page.update_entry(&id, &title, &content).await,
        JournalSubcommand::Delete { id } => page.delete_entry(&id).await,
    };
    if saved { Ok(()) } else { Err(CliError::ActionFailed("journal")) }
}

async fn run_profile(app: &mut App, profile: ProfileCommand) -> Result<(), CliError> {
    enter(app, View::Settings)?;
    let page = app.settings_page();
    match profile.command {
        ProfileSubcommand::Show => {
            let profile = page.load_profile().await.ok_or(CliError::ActionFailed("profile show"))?;
            println!("username: {}", profile.username);
            println!("email: {}", profile.email.as_deref().unwrap_or("-"));
            Ok(())
        }
        ProfileSubcommand::Email { email } => form_result(page.update_email(&email).await, "email update"),
        ProfileSubcommand::Password { new_password, confirm_password } => {
            form_result(page.update_password(&new_password, &confirm_password).await, "password update")
        }
        ProfileSubcommand::Delete => {
            let next = page.delete_account().await;
            follow(app, next, "account deletion")
        }
    }
}

/// Navigate to a protected view, failing when the guard refuses.
fn enter(app: &mut App, view: View) -> Result<(), CliError> {
    match app.open(view) {
        Navigation::Render(_) => Ok(()),
        Navigation::Redirect { from, to } => Err(CliError::Redirected { from, to }),
        Navigation::NotFound(path) => Err(CliError::NotFound(path)),
    }
}

fn follow(app: &mut App, next: Option<View>, action: &'static str) -> Result<(), CliError> {
    let succeeded = next.is_some();
    if let Some(navigation) = app.follow(next) {
        tracing::debug!(?navigation, "navigated");
    }
    if succeeded { Ok(()) } else { Err(CliError::ActionFailed(action)) }
}

fn form_result(outcome: FormOutcome, action: &'static str) -> Result<(), CliError> {
    match outcome {
        FormOutcome::Saved => Ok(()),
        FormOutcome::Notified => Err(CliError::ActionFailed(action)),
        FormOutcome::FieldError(message) => Err(CliError::Field(message)),
    }
}

fn print_notice(app: &App) {
    if let Some(notice) = app.take_notice() {
        println!("{notice}");
    }
}

// =============================================================================
// SHELL
// =============================================================================

async fn run_shell(app: &mut App) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", app.current_view());
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            return Ok(());
        };
        let words = match split_words(&line) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => return Ok(()),
            Some(_) => {}
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                if let Err(e) = run(app, parsed.command).await {
                    eprintln!("error: {e}");
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }
    }
}

/// Split a shell line on whitespace, honoring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, CliError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CliError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
