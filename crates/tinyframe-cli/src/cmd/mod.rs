use clap::{Args, Subcommand, ValueEnum};
use tinyframe::{ChecksumKind, Config, Peer};

use crate::exit::CliResult;
use crate::hexstr::parse_byte;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one frame and print its wire bytes.
    Encode(encode::EncodeArgs),
    /// Parse wire bytes and print every complete frame.
    Decode(decode::DecodeArgs),
    /// Show version information.
    Version,
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version => version::run(),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CksumArg {
    None,
    Xor8,
    Crc16,
    Crc32,
}

impl From<CksumArg> for ChecksumKind {
    fn from(arg: CksumArg) -> Self {
        match arg {
            CksumArg::None => ChecksumKind::None,
            CksumArg::Xor8 => ChecksumKind::Xor8,
            CksumArg::Crc16 => ChecksumKind::Crc16,
            CksumArg::Crc32 => ChecksumKind::Crc32,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PeerArg {
    Master,
    Slave,
}

impl From<PeerArg> for Peer {
    fn from(arg: PeerArg) -> Self {
        match arg {
            PeerArg::Master => Peer::Master,
            PeerArg::Slave => Peer::Slave,
        }
    }
}

/// Wire-format flags shared by encode and decode. Both ends of a link must
/// agree on these, so the same set appears on both subcommands.
#[derive(Args, Debug)]
pub struct WireArgs {
    /// Frame ID field width in bytes (1, 2 or 4).
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub id_bytes: usize,

    /// Length field width in bytes (1, 2 or 4).
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub len_bytes: usize,

    /// Type field width in bytes (1, 2 or 4).
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub type_bytes: usize,

    /// Checksum algorithm.
    #[arg(long, value_enum, default_value = "crc16")]
    pub cksum: CksumArg,

    /// Omit the start-of-frame byte.
    #[arg(long)]
    pub no_sof: bool,

    /// Start-of-frame byte value.
    #[arg(long, value_name = "BYTE", default_value = "0x01", value_parser = parse_byte)]
    pub sof_byte: u8,

    /// Maximum payload size in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = 1024)]
    pub max_payload: usize,
}

impl WireArgs {
    pub fn to_config(&self) -> Config {
        Config {
            id_bytes: self.id_bytes,
            len_bytes: self.len_bytes,
            type_bytes: self.type_bytes,
            checksum: self.cksum.into(),
            use_sof: !self.no_sof,
            sof_byte: self.sof_byte,
            max_payload_rx: self.max_payload,
            max_payload_tx: self.max_payload,
            ..Config::default()
        }
    }
}
