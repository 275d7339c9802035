use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};

mod api;
mod app;
mod config;
mod engine;
mod filters;
mod handler;
mod markdown;
mod tui;
mod ui;

use api::TutorClient;
use app::App;
use config::Config;
use engine::{Presentation, SendAction, Session};
use filters::{FilterField, FilterSelection};

#[derive(Parser)]
#[command(name = "eduquery")]
#[command(about = "Ask an AI tutor, filtered by board, language, class and subject")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI (default)
    Tui,
    /// Ask a single question and print the answer
    Ask {
        /// Your question (prompted for when omitted)
        question: Option<String>,
        /// Education board (UPMSP, CBSE, ICSE)
        #[arg(short, long)]
        board: Option<String>,
        /// Answer language (hindi, english)
        #[arg(short, long)]
        language: Option<String>,
        /// Class level (10, 11, 12)
        #[arg(short = 'c', long = "class")]
        class_level: Option<String>,
        /// Subject (math, science, history)
        #[arg(short, long)]
        subject: Option<String>,
        /// Service endpoint override
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// List the available filter values
    Filters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|_| Config::new());

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_tui(config).await?,
        Commands::Ask {
            question,
            board,
            language,
            class_level,
            subject,
            endpoint,
        } => {
            ask_once(
                &config, question, board, language, class_level, subject, endpoint,
            )
            .await?
        }
        Commands::Filters => list_filters(),
    }

    Ok(())
}

async fn run_tui(config: Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(&config);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }

    tui::restore()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn ask_once(
    config: &Config,
    question: Option<String>,
    board: Option<String>,
    language: Option<String>,
    class_level: Option<String>,
    subject: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    let mut filters = config.default_filters();
    apply_flag(&mut filters, FilterField::Board, board);
    apply_flag(&mut filters, FilterField::Language, language);
    apply_flag(&mut filters, FilterField::ClassLevel, class_level);
    apply_flag(&mut filters, FilterField::Subject, subject);

    // Let the user pick any field that is still unselected
    for field in filters.missing() {
        let options = field.options();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Select {}", field.label().to_lowercase()))
            .items(options)
            .default(0)
            .interact()?;
        filters.set(field, options[choice]);
    }

    let question = match question {
        Some(q) => q,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Question")
            .interact_text()?,
    };

    let base_url = endpoint.unwrap_or_else(|| config.endpoint());
    let client = TutorClient::new(&base_url);

    let mut session = Session::with_filters(Presentation::SingleAnswer, filters);
    match session.begin_send(&question) {
        SendAction::Dispatch(request) => {
            println!(
                "\n🤖 Asking the tutor ({} / {} / class {} / {})...\n",
                request.board.magenta(),
                request.language.magenta(),
                request.class_level.magenta(),
                request.subject.magenta(),
            );
            session.complete(client.ask(&request).await);
        }
        _ => unreachable!("single-answer sessions always dispatch"),
    }

    println!("{}", "Response:".bold().green());
    println!("{}", session.answer());
    Ok(())
}

fn apply_flag(filters: &mut FilterSelection, field: FilterField, value: Option<String>) {
    if let Some(value) = value {
        filters.set(field, &value);
        if filters.get(field) != value {
            eprintln!(
                "{} {} is not one of {:?}; ignoring",
                "warning:".yellow().bold(),
                value,
                field.options()
            );
        }
    }
}

fn list_filters() {
    println!("\n{}", "📚 Available filters".bold().blue());
    println!("{}", "=".repeat(30).dimmed());

    for field in FilterField::all() {
        println!("\n{}", field.label().bold().green());
        for option in field.options() {
            println!("  • {}", option);
        }
    }
}
