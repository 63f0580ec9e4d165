use std::io::BufRead;
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use status_runtime::config::{BarConfig, RendererKind};
use status_runtime::render::{parse_click_event, I3barRenderer, PlainRenderer};
use status_runtime::{InputEvent, Runtime};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const INPUT_QUEUE: usize = 64;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // stdout belongs to the bar protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    color_eyre::install()?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(BarConfig::default_path);

    let config = if path.exists() {
        BarConfig::load_from_path(&path)
            .wrap_err_with(|| format!("loading {}", path.display()))?
    } else {
        warn!("No config at {}, starting with an empty bar", path.display());
        BarConfig::default()
    };

    let mut runtime = Runtime::from_config(&config)?;
    let stop = CancellationToken::new();
    let (tx, rx) = mpsc::channel(INPUT_QUEUE);

    // A blocking stdin read must not hold up runtime shutdown.
    std::thread::spawn(move || read_clicks(tx));

    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Interrupted");
        }
        signal_stop.cancel();
    });

    let stdout = std::io::stdout();
    match config.renderer {
        RendererKind::I3bar => runtime.run(&mut I3barRenderer::new(stdout), rx, stop).await?,
        RendererKind::Plain => runtime.run(&mut PlainRenderer::new(stdout, " | "), rx, stop).await?,
    }

    Ok(())
}

/// Forward i3bar click events from stdin until it closes.
fn read_clicks(tx: mpsc::Sender<InputEvent>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read click events: {}", e);
                break;
            }
        };

        let Some(event) = parse_click_event(&line) else {
            continue;
        };
        if tx.blocking_send(event).is_err() {
            break;
        }
    }

    debug!("Click input closed");
}
