use std::io::{Read, Stdout};
use std::path::PathBuf;

use clap::Parser;
use futures_util::StreamExt;
use miette::{IntoDiagnostic, Result, WrapErr};
use mini_preview_core::{
    ApplyOutcome, ChannelError, Mode, PreviewConfig, PreviewContext, PreviewError, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

mod output;
mod transport;

use output::TerminalOutput;
use transport::{NativeTransport, run_writer};

type CliContext = PreviewContext<NativeTransport, TerminalOutput<Stdout>>;

/// Prefix of the interactive command that switches mode.
const MODE_COMMAND: &str = ":mode ";

#[derive(Parser)]
#[command(version, about = "Render MiniMessage input through a live renderer", long_about = None)]
struct Cli {
    /// Input file; stdin when absent or `-`
    source: Option<PathBuf>,

    /// Renderer WebSocket URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Presentation mode (chat_open, chat_closed, lore, hologram, server_list)
    #[arg(long, short)]
    mode: Option<String>,

    /// Config file (.json or .toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the connection open and render each stdin line as it arrives.
    /// `:mode <name>` switches mode.
    #[arg(long, short)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default(),
    };
    let config = config
        .with_env()?
        .with_overrides(cli.endpoint.as_deref(), cli.mode.as_deref())?;

    let input = if cli.interactive {
        String::new()
    } else {
        let source = cli.source.as_ref();
        read_source(source).wrap_err_with(|| match source {
            Some(path) => format!("failed to read {}", path.display()),
            None => "failed to read stdin".to_string(),
        })?
    };

    info!(endpoint = %config.endpoint, mode = %config.mode, "connecting to renderer");
    let (socket, _response) = connect_async(config.endpoint.as_str())
        .await
        .map_err(|e| ChannelError::Connect {
            endpoint: config.endpoint.to_string(),
            source: Box::new(e),
        })?;
    info!("connected to renderer");

    let (write, mut read) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(run_writer(write, rx));

    let mut ctx = PreviewContext::new(
        NativeTransport::new(tx),
        TerminalOutput::new(std::io::stdout()),
        config.mode,
    )
    .with_input(input);
    let opened = ctx.on_open()?;

    let result = if cli.interactive {
        run_interactive(&mut ctx, &mut read).await
    } else {
        render_once(&mut ctx, &mut read, opened).await
    };

    // Dropping the context drops the last transport handle; the writer then closes the socket.
    drop(ctx);
    let _ = writer.await;
    result
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

/// Read the whole input from `source`, or stdin when it's absent or `-`.
fn read_source(source: Option<&PathBuf>) -> Result<String, PreviewError> {
    let mut text = match source {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    // Editors end files with a newline; it isn't an empty last line.
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Wait for the single response to the initial submission.
async fn render_once<S>(ctx: &mut CliContext, read: &mut S, opened: SubmitOutcome) -> Result<()>
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    if opened == SubmitOutcome::Cleared {
        debug!("empty input, nothing to render");
        return Ok(());
    }

    while let Some(message) = read.next().await {
        let Some(outcome) = handle_socket_message(ctx, message)? else {
            break;
        };
        match outcome {
            ApplyOutcome::Rendered { lines } => {
                debug!(lines, "rendered");
                return Ok(());
            }
            ApplyOutcome::Failed(message) => {
                return Err(miette::miette!(
                    code = "mini_preview::render",
                    "the renderer rejected the input: {message}"
                ));
            }
            ApplyOutcome::Unknown => {
                return Err(miette::miette!(
                    code = "mini_preview::render",
                    "the renderer returned neither output nor an error"
                ));
            }
            ApplyOutcome::Ignored => {}
        }
    }

    Err(ChannelError::Closed.into())
}

/// Render stdin line by line until stdin or the socket closes.
async fn run_interactive<S>(ctx: &mut CliContext, read: &mut S) -> Result<()>
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.into_diagnostic()? else {
                    return Ok(());
                };
                handle_command(ctx, &line);
            }
            message = read.next() => {
                let Some(message) = message else {
                    ctx.on_close();
                    return Err(ChannelError::Closed.into());
                };
                if handle_socket_message(ctx, message)?.is_none() {
                    return Err(ChannelError::Closed.into());
                }
            }
        }
    }
}

/// One interactive line: a mode switch or new input.
fn handle_command(ctx: &mut CliContext, line: &str) {
    let result = match line.strip_prefix(MODE_COMMAND) {
        Some(name) => match name.trim().parse::<Mode>() {
            Ok(mode) => ctx.switch_mode(mode).map(|_| ()),
            Err(e) => {
                warn!(error = %e, "ignoring mode switch");
                return;
            }
        },
        None => ctx.set_input(line).map(|_| ()),
    };
    if let Err(e) = result {
        warn!(error = %e, "input not submitted");
    }
}

/// Apply one socket read. `None` once the connection is gone.
fn handle_socket_message(
    ctx: &mut CliContext,
    message: Result<Message, tokio_tungstenite::tungstenite::Error>,
) -> Result<Option<ApplyOutcome>> {
    match message {
        Ok(Message::Text(text)) => Ok(Some(ctx.handle_message(&text))),
        Ok(Message::Close(frame)) => {
            info!(?frame, "renderer closed the connection");
            ctx.on_close();
            Ok(None)
        }
        // Ping, pong, binary
        Ok(_) => Ok(Some(ApplyOutcome::Ignored)),
        Err(e) => {
            ctx.on_error();
            Err(e).into_diagnostic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mini-preview-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_source_drops_final_newline() {
        let path = temp_file("crlf.txt", "<red>one\\n<blue>two\r\n");
        assert_eq!(read_source(Some(&path)).unwrap(), "<red>one\\n<blue>two");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_source_keeps_inner_blank_lines() {
        let path = temp_file("blank.txt", "a\n\n");
        assert_eq!(read_source(Some(&path)).unwrap(), "a\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let path = std::env::temp_dir().join("mini-preview-does-not-exist.txt");
        let err = read_source(Some(&path)).unwrap_err();
        assert!(matches!(err, PreviewError::Io(_)));
    }
}
