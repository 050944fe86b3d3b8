//! Connects to a relay and logs every frame it delivers.
//!
//! Demonstrates:
//! - Building a client with the default reconnect and auto-start policy
//! - Consuming events through a [`StreamListener`]
//! - Graceful shutdown on Ctrl+C
//!
//! Usage:
//!   cargo run --example stream_dump -- 192.168.1.20:8765
//!   cargo run --example stream_dump -- http://camera.local:8765 --debug
//!   cargo run --example stream_dump -- --host 10.0.0.5 --port 8765

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use video_stream_client::transport::endpoint;
use video_stream_client::{Frame, StreamClient, StreamListener};

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    address: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    debug: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = Self {
            address: None,
            host: None,
            port: None,
            debug: false,
        };

        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" => args.debug = true,
                "--host" => args.host = Some(iter.next().context("--host needs a value")?),
                "--port" => {
                    let port = iter.next().context("--port needs a value")?;
                    args.port = Some(port.parse().context("--port is not a port number")?);
                }
                other if other.starts_with("--") => bail!("unknown flag {other}"),
                other => args.address = Some(other.to_owned()),
            }
        }

        Ok(args)
    }

    fn target(&self) -> anyhow::Result<String> {
        match (&self.address, &self.host, self.port) {
            (Some(address), None, None) => Ok(address.clone()),
            (None, Some(host), Some(port)) => Ok(endpoint(host, port)?.to_string()),
            _ => bail!("pass either an address or --host and --port"),
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "video_stream_client=debug,stream_dump=debug"
    } else {
        "video_stream_client=info,stream_dump=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Listener
// ============================================================================

/// Counts frames and prints a line per event.
#[derive(Default)]
struct Dump {
    frames: u64,
    bytes: u64,
}

impl StreamListener for Dump {
    fn on_frame_received(&mut self, frame: Frame) {
        self.frames += 1;
        self.bytes += frame.len() as u64;

        let format = frame
            .image_format()
            .map_or("unknown", |f| f.extensions_str().first().copied().unwrap_or("?"));
        println!("frame #{:<6} {:>8} bytes  {format}", self.frames, frame.len());
    }

    fn on_connection_status_changed(&mut self, connected: bool) {
        println!("[status] {}", if connected { "connected" } else { "disconnected" });
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("[error]  {message}");
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse()?;
    init_logging(args.debug);
    let target = args.target()?;

    println!("=== Stream Dump: {target} ===\n");

    let (client, mut events) = StreamClient::builder().build()?;
    client.connect(&target)?;

    let mut dump = Dump::default();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => event.dispatch(&mut dump),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\n[Ctrl+C] Disconnecting...");
                break;
            }
        }
    }

    client.disconnect();
    println!("Received {} frames, {} bytes total", dump.frames, dump.bytes);

    Ok(())
}
