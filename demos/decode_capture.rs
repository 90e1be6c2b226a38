// ABOUTME: Decodes a file of hex-encoded SMS DTAP frames into one session and prints SQL inserts
// ABOUTME: Shows decoder configuration, per-frame summaries and rejection handling

//! # Capture decoding
//!
//! Input is a text file with one hex-encoded DTAP message per line. Blank lines
//! and lines starting with `#` are skipped.
//!
//! ```bash
//! cargo run --example decode_capture -- --input frames.txt
//!
//! # Treat PID 0x7D as OTA as well and show per-layer debug output
//! cargo run --example decode_capture -- --input frames.txt --ota-pid 125 -d
//! ```

use argh::FromArgs;
use smsmeta::{Decoder, DecoderConfig, Dispatch, Session, to_insert_statement};
use std::error::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Decode SMS DTAP frames captured on the air interface
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// file with one hex-encoded DTAP message per line
    #[argh(option, short = 'i')]
    input: String,

    /// session id written into the insert statements (default: 1)
    #[argh(option)]
    session_id: Option<u32>,

    /// additional TP-PID value to treat as OTA
    #[argh(option)]
    ota_pid: Vec<u8>,

    /// capacity for raw user data in octets (default: 140)
    #[argh(option)]
    max_user_data: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = DecoderConfig::default();
    for pid in cli_args.ota_pid {
        config = config.with_ota_protocol_id(pid);
    }
    if let Some(max_user_data) = cli_args.max_user_data {
        config = config.with_max_user_data(max_user_data);
    }

    let decoder = Decoder::new(config);
    let mut session = Session::new(cli_args.session_id.unwrap_or(1));

    let file = File::open(&cli_args.input).await?;
    let mut lines = BufReader::new(file).lines();
    let mut line_number = 0usize;
    let (mut accepted, mut rejected) = (0usize, 0usize);

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let frame = match hex::decode(line.replace(' ', "")) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("line {line_number}: not hex: {e}");
                continue;
            }
        };

        match decoder.decode_sms(&mut session, &frame) {
            Ok(Dispatch::Message { sequence }) => {
                accepted += 1;
                info!("line {line_number}: #{sequence} {}", session.summary());
            }
            Ok(Dispatch::Signalling) => info!("line {line_number}: {}", session.summary()),
            Err(e) if e.is_fatal() => {
                rejected += 1;
                warn!("line {line_number}: {} ({e})", session.summary());
            }
            Err(e) => info!("line {line_number}: skipped, {e}"),
        }
    }

    let flags = session.flags();
    info!(
        "{accepted} messages, {rejected} rejected (mo={}, mt={}, unknown={})",
        flags.mo, flags.mt, flags.unknown
    );

    let mut stdout = tokio::io::stdout();
    for message in session.messages().rev() {
        stdout
            .write_all(to_insert_statement(session.id(), message).as_bytes())
            .await?;
    }
    stdout.flush().await?;

    Ok(())
}
