//! MCP (Model Context Protocol) server for the Dragon emulator.
//!
//! Exposes the machine as a JSON-RPC 2.0 server over stdin/stdout so
//! scripts and agents can boot, step, observe, and capture it
//! headlessly. One newline-delimited request per line, responses on
//! stdout, diagnostics on stderr.

use std::io::{self, BufRead, Write};

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use emu_core::Observable;

use crate::capture::indexed_to_rgba;
use crate::config::{DragonConfig, ROM_SIZE};
use crate::dragon::Dragon;
use crate::host::HeadlessHost;

#[derive(Deserialize)]
struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: JsonValue,
    id: JsonValue,
}

#[derive(Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: JsonValue,
}

#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

impl RpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: JsonValue, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError { code, message }),
            id,
        }
    }
}

/// The JSON-RPC server. Owns at most one machine at a time.
pub struct McpServer {
    dragon: Option<Dragon<HeadlessHost>>,
}

impl McpServer {
    #[must_use]
    pub fn new() -> Self {
        Self { dragon: None }
    }

    /// Serve requests from stdin until it closes.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let stdout = io::stdout();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            let mut out = stdout.lock();
            let _ = serde_json::to_writer(&mut out, &response);
            let _ = out.write_all(b"\n");
            let _ = out.flush();
        }
    }

    fn handle_line(&mut self, line: &str) -> RpcResponse {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                return RpcResponse::failure(JsonValue::Null, -32700, format!("parse error: {e}"));
            }
        };

        let id = request.id.clone();
        match self.dispatch(&request) {
            Ok(result) => RpcResponse::success(id, result),
            Err(message) => RpcResponse::failure(id, -32000, message),
        }
    }

    fn dispatch(&mut self, request: &RpcRequest) -> Result<JsonValue, String> {
        match request.method.as_str() {
            "boot" => self.boot(&request.params),
            "step" => self.step(&request.params),
            "query" => self.query(&request.params),
            "read_memory" => self.read_memory(&request.params),
            "press_key" => self.key_event(&request.params, false),
            "release_key" => self.key_event(&request.params, true),
            "insert_cassette" => self.insert_cassette(&request.params),
            "screenshot" => self.screenshot(),
            "mnemonic" => self.mnemonic(&request.params),
            other => Err(format!("unknown method: {other}")),
        }
    }

    fn machine(&mut self) -> Result<&mut Dragon<HeadlessHost>, String> {
        self.dragon.as_mut().ok_or_else(|| "not booted".to_string())
    }

    fn boot(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let rom_path = params["rom"]
            .as_str()
            .ok_or_else(|| "boot requires a rom path".to_string())?;
        let rom = std::fs::read(rom_path).map_err(|e| format!("failed to read {rom_path}: {e}"))?;
        if rom.len() != ROM_SIZE {
            return Err(format!("ROM must be {ROM_SIZE} bytes, got {}", rom.len()));
        }

        let mut host = HeadlessHost::new();
        host.set_time_step(20);
        let dragon = Dragon::new(&DragonConfig { rom }, host)?;
        self.dragon = Some(dragon);
        Ok(json!({ "booted": true }))
    }

    fn step(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let count = params["count"].as_u64().unwrap_or(1).min(10_000_000) as u32;
        let dragon = self.machine()?;
        let state = dragon.run(count)?;
        Ok(json!({
            "state": format!("{state:?}"),
            "pc": dragon.cpu.regs.pc,
            "function_key": dragon.function_key(),
        }))
    }

    fn query(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let path = params["path"]
            .as_str()
            .ok_or_else(|| "query requires a path".to_string())?;
        let dragon = self.machine()?;
        match dragon.query(path) {
            Some(value) => Ok(json!({ "value": value.to_string() })),
            None => Err(format!("unknown query path: {path}")),
        }
    }

    fn read_memory(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let addr = params["addr"]
            .as_u64()
            .ok_or_else(|| "read_memory requires addr".to_string())?;
        let len = params["len"].as_u64().unwrap_or(1).min(4096);
        let dragon = self.machine()?;

        let mut bytes = Vec::with_capacity(len as usize);
        for offset in 0..len {
            let address = ((addr + offset) & 0xFFFF) as u16;
            bytes.push(dragon.bus.mem.peek(address));
        }
        Ok(json!({ "bytes": bytes }))
    }

    fn key_event(&mut self, params: &JsonValue, release: bool) -> Result<JsonValue, String> {
        let code = params["code"]
            .as_u64()
            .ok_or_else(|| "key event requires a scan code".to_string())? as u8;
        let dragon = self.machine()?;
        if release {
            dragon.bus.host.release_key(code);
        } else {
            dragon.bus.host.press_key(code);
        }
        Ok(json!({ "queued": true }))
    }

    fn insert_cassette(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let path = params["path"]
            .as_str()
            .ok_or_else(|| "insert_cassette requires a path".to_string())?;
        let data = std::fs::read(path).map_err(|e| format!("failed to read {path}: {e}"))?;
        let size = data.len();
        let dragon = self.machine()?;
        dragon.bus.host.mount_cassette(data);
        Ok(json!({ "bytes": size }))
    }

    fn screenshot(&mut self) -> Result<JsonValue, String> {
        let dragon = self.machine()?;
        let (framebuffer, width, height) = dragon.bus.vdg.framebuffer();
        let rgba = indexed_to_rgba(framebuffer);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&rgba);
        Ok(json!({
            "width": width,
            "height": height,
            "format": "rgba8",
            "data": encoded,
        }))
    }

    fn mnemonic(&mut self, params: &JsonValue) -> Result<JsonValue, String> {
        let addr = params["addr"]
            .as_u64()
            .ok_or_else(|| "mnemonic requires addr".to_string())? as u16;
        let dragon = self.machine()?;
        let mnemonic = dragon.cpu.mnemonic_at(&mut dragon.bus, addr);
        Ok(json!({ "mnemonic": mnemonic }))
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}
