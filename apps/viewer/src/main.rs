use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpTransport, QueryController, QueryError, ViewSurface};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod commands;
mod print;

use commands::{parse_command, Command, HELP};
use print::{render_surface, CellStyle};

#[derive(Parser, Debug)]
#[command(about = "Terminal viewer for simulated combinations and terms")]
struct Args {
    /// Simulator base URL; overrides viewer.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Request timeout in seconds, 0 waits forever.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(short = 's', long = "s")]
    s: Option<String>,
    #[arg(short = 'p', long = "p")]
    p: Option<String>,
    #[arg(short = 'd', long = "d")]
    d: Option<String>,
    #[arg(short = 'f', long = "f")]
    f: Option<String>,
    /// Configuration rows printed per page.
    #[arg(long, default_value_t = 25)]
    max_rows: usize,
    /// Print terms as HTML fragments instead of Unicode.
    #[arg(long)]
    markup: bool,
    /// Load the first page, print it, and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url.clone() {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    let mut inputs = settings.default_parameters.clone();
    for (slot, value) in [
        (&mut inputs.s, &args.s),
        (&mut inputs.p, &args.p),
        (&mut inputs.d, &args.d),
        (&mut inputs.f, &args.f),
    ] {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }

    let transport = HttpTransport::new(&settings.server_url)
        .with_context(|| format!("invalid simulator url '{}'", settings.server_url))?;
    tracing::info!(endpoint = %transport.endpoint(), "simulator endpoint");

    let style = if args.markup {
        CellStyle::Markup
    } else {
        CellStyle::Unicode
    };
    let mut controller =
        QueryController::new(ViewSurface::new(inputs)).with_timeout(settings.request_timeout());

    let outcome = controller.on_document_ready(&transport).await;
    report(&controller, outcome, args.max_rows, style);
    if args.once {
        return Ok(());
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let outcome = match command {
            Command::Next => controller.go_to_next_page(&transport).await,
            Command::Prev => controller.go_to_previous_page(&transport).await,
            Command::Submit(params) => {
                if let Some(params) = params {
                    controller.surface_mut().inputs = params;
                }
                controller.on_submit(&transport).await
            }
            Command::Set { axis, value } => {
                *controller.surface_mut().inputs.get_mut(axis) = value;
                println!("{axis} set; 'submit' to run it");
                continue;
            }
            Command::Show => Ok(()),
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };
        report(&controller, outcome, args.max_rows, style);
    }

    Ok(())
}

fn report(
    controller: &QueryController<ViewSurface>,
    outcome: Result<(), QueryError>,
    max_rows: usize,
    style: CellStyle,
) {
    match outcome {
        Ok(()) => print!("{}", render_surface(controller.surface(), max_rows, style)),
        Err(err) if err.is_rejection() => eprintln!("{err}"),
        Err(err) => {
            eprintln!("simulation failed: {err}");
            print!("{}", render_surface(controller.surface(), max_rows, style));
        }
    }
}
