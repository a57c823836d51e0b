use std::cell::RefCell;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tinyframe::{Msg, Peer, TinyFrame};
use tracing::{debug, warn};

use crate::cmd::WireArgs;
use crate::exit::{engine_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::hexstr::parse_hex;
use crate::output::{print_frame, FrameView, OutputFormat};

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex wire bytes. Reads stdin when absent.
    pub hex: Option<String>,

    /// Read wire bytes from a file instead.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,

    /// Treat file/stdin input as raw bytes rather than hex text.
    #[arg(long)]
    pub raw: bool,

    #[command(flatten)]
    pub wire: WireArgs,
}

type Engine = TinyFrame<std::io::Sink>;

// Listener callbacks are plain function pointers; decoded frames collect
// through a thread-local instead of a capture.
thread_local! {
    static DECODED: RefCell<Vec<FrameView>> = RefCell::new(Vec::new());
}

fn capture(_tf: &mut Engine, msg: &mut Msg) -> bool {
    DECODED.with(|d| {
        d.borrow_mut().push(FrameView {
            frame_id: msg.frame_id,
            frame_type: msg.frame_type,
            payload: msg.payload_bytes().to_vec(),
        })
    });
    true
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = resolve_input(&args)?;
    debug!(bytes = bytes.len(), "decoding input");

    let mut engine = TinyFrame::with_config(std::io::sink(), Peer::Slave, args.wire.to_config())
        .map_err(|err| engine_error("bad wire configuration", err))?;
    engine
        .add_generic_listener(capture)
        .map_err(|err| engine_error("listener setup failed", err))?;

    DECODED.with(|d| d.borrow_mut().clear());
    engine.accept(&bytes);

    let frames = DECODED.with(|d| std::mem::take(&mut *d.borrow_mut()));
    for view in &frames {
        print_frame(view, None, format);
    }

    if frames.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            "no complete frame in the input",
        ));
    }
    if engine.parse_in_flight() {
        warn!("trailing bytes form an incomplete frame");
        return Err(CliError::new(
            DATA_INVALID,
            "trailing bytes form an incomplete frame",
        ));
    }
    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex).map_err(|err| CliError::new(USAGE, format!("bad hex input: {err}")));
    }

    let raw = if let Some(path) = &args.file {
        fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("failed reading stdin", err))?;
        buf
    };

    if args.raw {
        return Ok(raw);
    }
    let text = String::from_utf8(raw)
        .map_err(|_| CliError::new(USAGE, "input is not hex text (use --raw for binary)"))?;
    parse_hex(&text).map_err(|err| CliError::new(USAGE, format!("bad hex input: {err}")))
}
