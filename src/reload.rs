//! Live reload over WebSocket.
//!
//! Browsers connect to a plain WebSocket endpoint on `reload_port`; after
//! every successful rebuild the watcher calls [`ReloadHub::broadcast`] and
//! each connected page reloads itself.
//!
//! ```text
//! watcher ──rebuild ok──▶ ReloadHub ──"reload"──▶ browser tabs
//! ```

use crate::log;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
};
use tungstenite::{Message, WebSocket};

/// Message that triggers a page reload.
const RELOAD_MESSAGE: &str = "reload";

/// Connected browser tabs.
pub struct ReloadHub {
    addr: SocketAddr,
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
}

impl ReloadHub {
    /// Bind the WebSocket endpoint and start accepting clients in the background.
    pub fn bind(addr: SocketAddr) -> Result<Arc<Self>> {
        let listener =
            TcpListener::bind(addr).with_context(|| format!("Failed to bind reload socket {addr}"))?;
        let addr = listener.local_addr()?;

        let hub = Arc::new(Self {
            addr,
            clients: Mutex::new(Vec::new()),
        });

        let acceptor = Arc::clone(&hub);
        thread::spawn(move || acceptor.accept_loop(&listener));

        log!("reload"; "ws://{addr}");
        Ok(hub)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    fn accept_loop(&self, listener: &TcpListener) {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    log!("reload"; "connection failed: {err}");
                    continue;
                }
            };

            match tungstenite::accept(stream) {
                Ok(socket) => self.clients.lock().push(socket),
                Err(err) => log!("reload"; "handshake failed: {err}"),
            }
        }
    }

    /// Tell every client to reload. Disconnected clients are dropped.
    ///
    /// Returns the number of clients still connected.
    pub fn broadcast(&self) -> usize {
        let mut clients = self.clients.lock();
        clients.retain_mut(|socket| socket.send(Message::text(RELOAD_MESSAGE)).is_ok());
        clients.len()
    }
}

/// Client snippet that reloads the page on a `reload` message and
/// reconnects when the server goes away.
pub fn client_script(port: u16) -> String {
    format!(
        "<script>(function(){{\
function connect(){{\
var ws=new WebSocket('ws://'+location.hostname+':{port}');\
ws.onmessage=function(e){{if(e.data==='{RELOAD_MESSAGE}')location.reload();}};\
ws.onclose=function(){{setTimeout(connect,1000);}};\
}}\
connect();\
}})();</script>"
    )
}

/// Insert `script` before the last `</body>`, or append it.
pub fn inject(html: &str, script: &str) -> String {
    let mut out = String::with_capacity(html.len() + script.len());
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(idx) => {
            out.push_str(&html[..idx]);
            out.push_str(script);
            out.push_str(&html[idx..]);
        }
        None => {
            out.push_str(html);
            out.push_str(script);
        }
    }
    out
}
