// File: chain-clock/tests/common/mod.rs
//
// Minimal ganache-style JSON-RPC node for transport tests
//
// Serves one request per connection over plain HTTP/1.1 and answers the
// test-mode control methods from in-memory state.

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const GENESIS_TIME: u64 = 1_700_000_000;

/// How the node misbehaves, if at all
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Answer the time shift with this JSON-RPC error
    pub reject_shift: Option<(i64, String)>,
    /// Close the connection without answering the mine request
    pub drop_mine: bool,
    /// Answer every request with this HTTP status
    pub http_status: Option<u16>,
    /// Return a block header without a timestamp
    pub malformed_block: bool,
}

#[derive(Debug)]
struct NodeState {
    /// Block timestamps, index == number
    blocks: Vec<u64>,
    offset: u64,
    methods: Vec<String>,
    faults: Faults,
}

enum Reply {
    Result(Value),
    Error(i64, String),
    Status(u16),
    Drop,
}

impl NodeState {
    fn block_json(&self, number: usize) -> Value {
        if self.faults.malformed_block {
            return json!({ "number": format!("0x{:x}", number) });
        }
        json!({
            "number": format!("0x{:x}", number),
            "timestamp": format!("0x{:x}", self.blocks[number]),
            "hash": format!("0x{:064x}", number),
        })
    }

    fn handle(&mut self, method: &str, params: &Value) -> Reply {
        self.methods.push(method.to_string());
        if let Some(status) = self.faults.http_status {
            return Reply::Status(status);
        }

        match method {
            "eth_getBlockByNumber" => match self.blocks.len() {
                0 => Reply::Result(Value::Null),
                n => Reply::Result(self.block_json(n - 1)),
            },
            "evm_increaseTime" | "anvil_increaseTime" => {
                if let Some((code, message)) = self.faults.reject_shift.clone() {
                    return Reply::Error(code, message);
                }
                let secs = params[0].as_u64().unwrap_or(0);
                self.offset += secs;
                Reply::Result(json!(format!("0x{:x}", self.offset)))
            }
            "evm_mine" | "anvil_mine" => {
                if self.faults.drop_mine {
                    return Reply::Drop;
                }
                let previous = self.blocks.last().copied().unwrap_or(GENESIS_TIME);
                self.blocks.push(previous.max(GENESIS_TIME + self.offset));
                Reply::Result(json!("0x0"))
            }
            other => Reply::Error(-32601, format!("Method {} not found", other)),
        }
    }
}

pub struct FakeNode {
    addr: SocketAddr,
    state: Arc<Mutex<NodeState>>,
    handle: JoinHandle<()>,
}

impl FakeNode {
    /// Node with a genesis block at [`GENESIS_TIME`]
    pub async fn start() -> Self {
        Self::start_with_blocks(vec![GENESIS_TIME]).await
    }

    /// Node that has not produced any block
    pub async fn start_empty() -> Self {
        Self::start_with_blocks(Vec::new()).await
    }

    async fn start_with_blocks(blocks: Vec<u64>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(NodeState {
            blocks,
            offset: 0,
            methods: Vec::new(),
            faults: Faults::default(),
        }));

        let shared = state.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let shared = shared.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, shared).await;
                });
            }
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Methods received so far, in arrival order
    pub fn methods(&self) -> Vec<String> {
        self.state.lock().methods.clone()
    }

    pub fn block_count(&self) -> usize {
        self.state.lock().blocks.len()
    }

    pub fn set_faults(&self, faults: Faults) {
        self.state.lock().faults = faults;
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<NodeState>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request: Value = serde_json::from_slice(&buf[header_end..header_end + content_length])?;
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let reply = state.lock().handle(&method, &request["params"]);

    let (status, body) = match reply {
        Reply::Drop => return Ok(()),
        Reply::Status(code) => (code, String::new()),
        Reply::Result(result) => (
            200,
            json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string(),
        ),
        Reply::Error(code, message) => (
            200,
            json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": { "code": code, "message": message }
            })
            .to_string(),
        ),
    };

    let response = format!(
        "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
