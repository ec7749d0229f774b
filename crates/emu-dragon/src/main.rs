//! Dragon 32 emulator binary.
//!
//! Headless runner: boots a ROM image, optionally mounts a cassette,
//! runs a number of instruction ticks, and can save a screenshot or
//! serve the machine over MCP (JSON-RPC on stdio). Physical frontends
//! (display, GPIO, SD card) live outside this repository and drive the
//! machine through the `Host` trait instead.

use std::path::PathBuf;
use std::process;

use emu_dragon::mcp::McpServer;
use emu_dragon::{Dragon, DragonConfig, HeadlessHost, ROM_SIZE, capture};

struct CliArgs {
    rom_path: Option<PathBuf>,
    cas_path: Option<PathBuf>,
    ticks: u32,
    screenshot_path: Option<PathBuf>,
    mcp: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        rom_path: None,
        cas_path: None,
        ticks: 2_000_000,
        screenshot_path: None,
        mcp: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rom" => {
                i += 1;
                cli.rom_path = args.get(i).map(PathBuf::from);
            }
            "--cas" => {
                i += 1;
                cli.cas_path = args.get(i).map(PathBuf::from);
            }
            "--ticks" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.ticks = s.parse().unwrap_or(cli.ticks);
                }
            }
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--mcp" => {
                cli.mcp = true;
            }
            "--help" | "-h" => {
                eprintln!("Usage: emu-dragon [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --rom <file>         16 KiB system ROM image (required unless --mcp)");
                eprintln!("  --cas <file>         Mount a cassette byte stream");
                eprintln!("  --ticks <n>          Instructions to run [default: 2000000]");
                eprintln!("  --screenshot <file>  Save a PNG of the final frame");
                eprintln!("  --mcp                Serve the machine over JSON-RPC on stdio");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    if cli.mcp {
        let mut server = McpServer::new();
        server.run();
        return;
    }

    let Some(ref rom_path) = cli.rom_path else {
        eprintln!("--rom <file> is required (see --help)");
        process::exit(1);
    };
    let rom = match std::fs::read(rom_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read ROM {}: {e}", rom_path.display());
            process::exit(1);
        }
    };
    if rom.len() != ROM_SIZE {
        eprintln!("ROM must be {ROM_SIZE} bytes, got {}", rom.len());
        process::exit(1);
    }

    let mut host = HeadlessHost::new();
    if let Some(ref cas_path) = cli.cas_path {
        match std::fs::read(cas_path) {
            Ok(data) => {
                eprintln!("Mounted cassette: {} ({} bytes)", cas_path.display(), data.len());
                host.mount_cassette(data);
            }
            Err(e) => {
                eprintln!("Failed to read cassette {}: {e}", cas_path.display());
                process::exit(1);
            }
        }
    }

    let mut dragon = match Dragon::new(&DragonConfig { rom }, host) {
        Ok(dragon) => dragon,
        Err(e) => {
            eprintln!("Failed to build machine: {e}");
            process::exit(1);
        }
    };

    for _ in 0..cli.ticks {
        match dragon.tick() {
            Ok(_) => {}
            Err(e) => {
                eprintln!("Fatal: {e}");
                process::exit(1);
            }
        }
        if dragon.function_key() == 1 {
            eprintln!("Loader escape requested (F1); no loader in headless mode");
        }
    }

    if let Some(ref path) = cli.screenshot_path {
        let (framebuffer, width, height) = dragon.bus.vdg.framebuffer();
        if let Err(e) = capture::save_screenshot(framebuffer, width, height, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }

    eprintln!(
        "Ran {} ticks, stopped at PC {:#06X} ({})",
        cli.ticks,
        dragon.cpu.regs.pc,
        dragon.cpu.mnemonic_at(&mut dragon.bus, dragon.cpu.regs.pc),
    );
}
