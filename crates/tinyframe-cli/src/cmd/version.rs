use crate::exit::{CliResult, SUCCESS};

pub fn run() -> CliResult<i32> {
    println!("tf {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    Ok(SUCCESS)
}
