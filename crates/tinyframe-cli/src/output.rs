use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::hexstr::to_hex;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A frame as shown to the operator, decoded or freshly encoded.
pub struct FrameView {
    pub frame_id: u32,
    pub frame_type: u32,
    pub payload: Vec<u8>,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame_id: u32,
    frame_type: u32,
    payload_size: usize,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    wire: Option<&'a str>,
}

/// Print one frame; with `wire` set the raw frame bytes are included
/// (used by `encode`, where they are the primary result).
pub fn print_frame(view: &FrameView, wire: Option<&[u8]>, format: OutputFormat) {
    let wire_hex = wire.map(to_hex);
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                frame_id: view.frame_id,
                frame_type: view.frame_type,
                payload_size: view.payload.len(),
                payload: payload_preview(&view.payload),
                wire: wire_hex.as_deref(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "TYPE", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    format!("{:#04x}", view.frame_id),
                    format!("{:#04x}", view.frame_type),
                    view.payload.len().to_string(),
                    payload_preview(&view.payload),
                ]);
            println!("{table}");
            if let Some(hex) = &wire_hex {
                println!("wire: {hex}");
            }
        }
        OutputFormat::Pretty => {
            println!(
                "id={:#04x} type={:#04x} size={} payload={}",
                view.frame_id,
                view.frame_type,
                view.payload.len(),
                payload_preview(&view.payload)
            );
            if let Some(hex) = &wire_hex {
                println!("wire: {hex}");
            }
        }
        OutputFormat::Raw => match wire {
            Some(bytes) => print_raw(bytes),
            None => print_raw(&view.payload),
        },
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().all(|c| !c.is_control()) => text.to_string(),
        _ => format!("0x{}", to_hex(payload)),
    }
}
