use std::fs;
use std::path::PathBuf;

use clap::Args;
use tinyframe::{Msg, TinyFrame};
use tracing::debug;

use crate::cmd::{PeerArg, WireArgs};
use crate::exit::{engine_error, CliResult, SUCCESS};
use crate::hexstr::{parse_hex, parse_u32};
use crate::output::{print_frame, FrameView, OutputFormat};

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type.
    #[arg(long = "type", short = 't', value_name = "TYPE", value_parser = parse_u32)]
    pub frame_type: u32,

    /// Text payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,

    /// Hex payload, e.g. "aa bb cc".
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,

    /// Read the payload from a file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,

    /// Build a response frame, reusing --id instead of allocating.
    #[arg(long, requires = "id")]
    pub response: bool,

    /// Frame ID for --response.
    #[arg(long, value_name = "ID", value_parser = parse_u32)]
    pub id: Option<u32>,

    /// Peer role used when allocating a fresh frame ID.
    #[arg(long, value_enum, default_value = "master")]
    pub peer: PeerArg,

    #[command(flatten)]
    pub wire: WireArgs,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let config = args.wire.to_config();

    let mut engine = TinyFrame::with_config(Vec::new(), args.peer.into(), config)
        .map_err(|err| engine_error("bad wire configuration", err))?;

    let mut msg = Msg::new(args.frame_type, payload);
    if args.response {
        msg.frame_id = args.id.unwrap_or_default();
        msg.is_response = true;
    }
    engine
        .send(&mut msg)
        .map_err(|err| engine_error("encode failed", err))?;

    let view = FrameView {
        frame_id: msg.frame_id,
        frame_type: msg.frame_type,
        payload: msg.payload_bytes().to_vec(),
    };
    let wire = engine.into_inner();
    debug!(bytes = wire.len(), frame_id = view.frame_id, "frame encoded");

    print_frame(&view, Some(&wire), format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex)
            .map_err(|err| crate::exit::CliError::new(crate::exit::USAGE, format!("--hex: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Ok(Vec::new())
}
