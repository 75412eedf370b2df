//! Course Load Evaluator
//!
//! Front end for the course-load risk prediction service.
//!
//! # Usage
//!
//! ```bash
//! course-load-evaluator serve --port 5555
//! course-load-evaluator shell
//! course-load-evaluator --api-url http://risk.internal:8000 shell
//! ```

use clap::{Parser, Subcommand};
use course_load_evaluator::api_client::RiskApiClient;
use course_load_evaluator::commands::{self, Command, ParseError};
use course_load_evaluator::config::Config;
use course_load_evaluator::errors::AppError;
use course_load_evaluator::form::FormController;
use course_load_evaluator::line_reader::{LineReader, ReadEvent};
use course_load_evaluator::{text_view, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "course-load-evaluator")]
#[command(version)]
#[command(about = "Estimate course-load overload risk with a remote model", long_about = None)]
struct Cli {
    /// Prediction service origin
    #[arg(long, global = true, env = "RISK_API_BASE_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the evaluator page over HTTP (default)
    Serve {
        /// Port to listen on
        #[arg(long, short, env = "PORT")]
        port: Option<u16>,
    },
    /// Interactive evaluator in the terminal
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the shell's stdout only carries the page.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_load_evaluator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Loaded before parsing so `.env` values reach the `env` fallbacks of the flags.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(url)?;
    }
    tracing::info!("Configuration loaded successfully");

    let client = RiskApiClient::from_config(&config)?;
    tracing::info!("Risk API client initialized: {}", client.base_url());

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config, client).await
        }
        Commands::Shell => shell(config, client).await,
    }
}

async fn serve(config: Config, client: RiskApiClient) -> anyhow::Result<()> {
    let state = web::AppState::new(FormController::new(client), &config);

    tokio::spawn(web::load_metadata(state.clone()));

    let app = web::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Evaluator page listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

const PROMPT: &str = "evaluator> ";

async fn shell(config: Config, client: RiskApiClient) -> anyhow::Result<()> {
    let host = config.backend_host();
    let mut controller = FormController::new(client);

    println!("{}", text_view::render_header(&controller, &host));
    println!("Loading model metadata…");
    tokio::select! {
        _ = controller.load() => {}
        _ = tokio::signal::ctrl_c() => return Ok(()),
    }
    println!("{}", text_view::render_page(&controller, &host));
    println!("Type 'help' for commands.");

    let reader = LineReader::spawn();
    loop {
        let line = match reader.read_line(PROMPT).await {
            ReadEvent::Line(line) => line,
            // Ctrl-C at the prompt drops the line being typed.
            ReadEvent::Interrupted => continue,
            ReadEvent::Eof => break,
            ReadEvent::Failed(message) => anyhow::bail!(message),
        };

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Show => println!("{}", text_view::render_page(&controller, &host)),
            Command::Fields => println!("{}", text_view::render_inputs(&controller)),
            Command::Set { name, value } => {
                if controller.change(&name, &value) {
                    println!("{} = {:?}", name, value);
                } else if controller.form_visible() {
                    println!("unknown feature '{}'", name);
                } else {
                    println!("the form is not available");
                }
            }
            Command::Example => {
                if controller.fill_example() {
                    println!("{}", text_view::render_inputs(&controller));
                } else {
                    println!(
                        "Fill example is only available while ready (status: {})",
                        controller.status()
                    );
                }
            }
            Command::Submit => {
                if !controller.can_submit() {
                    println!("Cannot submit while {}", controller.status());
                    continue;
                }
                println!("Evaluating…");
                // The editor is idle during an evaluation, so Ctrl-C arrives as SIGINT.
                let abort = async {
                    let _ = tokio::signal::ctrl_c().await;
                };
                // Failures are recorded on the controller and shown with the page.
                let _ = controller.submit_until(abort).await;
                println!("{}", text_view::render_inputs(&controller));
                println!("{}", text_view::render_result(&controller));
            }
            Command::Raw => match text_view::render_raw(&controller) {
                Some(raw) => println!("{}", raw),
                None => println!("no result yet"),
            },
            Command::Reload => {
                println!("Loading model metadata…");
                let interrupted = tokio::select! {
                    _ = controller.load() => false,
                    _ = tokio::signal::ctrl_c() => true,
                };
                if interrupted {
                    controller.finish_load(Err(AppError::MetadataFetch));
                }
                println!("{}", text_view::render_page(&controller, &host));
            }
            Command::Help => println!("{}", commands::HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}
