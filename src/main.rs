use std::io::Stdout;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use file_client::{
    config::Config,
    console::{self, ConsoleCommand, ParseError},
    download::DirectoryTarget,
    messages::Messages,
    service::Event,
    transport::HttpTransport,
    view::TerminalView,
    App,
};

type TerminalApp = App<HttpTransport, TerminalView<Stdout>, DirectoryTarget>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so it stays out of the rendered view)
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "file-client starting");

    let config = Config::load()?;
    info!("Using file API at: {}", config.api.base_url);

    let transport = HttpTransport::new(&config.api.base_url)?;
    let target = DirectoryTarget::new(&config.download.dir)?;
    info!("Saving downloads to: {}", config.download.dir);

    let view = TerminalView::new(std::io::stdout(), Messages::for_locale(config.locale));

    TerminalApp::install_panic_hook();
    let mut app = TerminalApp::new(transport, view, target).await;

    println!("{}", console::HELP);
    run_console(&mut app).await?;

    info!("Shutdown complete");
    Ok(())
}

async fn run_console(app: &mut TerminalApp) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        };

        // EOF
        let Some(line) = line else {
            return Ok(());
        };

        match console::parse_line(&line) {
            Ok(ConsoleCommand::Quit) => return Ok(()),
            Ok(ConsoleCommand::Help) => println!("{}", console::HELP),
            Ok(ConsoleCommand::Refresh) => app.handle(Event::Refresh).await,
            Ok(ConsoleCommand::Select(path)) => {
                app.select_path(path).await;
            }
            Ok(ConsoleCommand::Upload(path)) => app.upload(path).await,
            Ok(ConsoleCommand::Get(n)) => {
                let target = app.view().click_row(n);
                app.handle(Event::ListClick(target)).await;
            }
            Err(ParseError::Empty) => {}
            Err(e) => {
                println!("{e}");
                println!("{}", console::HELP);
            }
        }
    }
}
