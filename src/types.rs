// src/types.rs
use serde::{Deserialize, Serialize};
use crate::protocol::{Sample, StreamStats};
/// Where the byte stream comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Device access point over TCP.
    #[default]
    Tcp,
    Serial,
    /// Built-in synthetic device.
    Simulation,
}
impl ConnectionMode {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionMode::Tcp => "TCP",
            ConnectionMode::Serial => "SERIAL",
            ConnectionMode::Simulation => "SIM",
        }
    }
}
/// Commands from the viewer to the engine thread.
#[derive(Clone, Debug)]
pub enum GuiCommand {
    Connect(ConnectionMode),
    Disconnect,
}
/// Messages from the engine thread to the viewer.
#[derive(Clone, Debug)]
pub enum StreamMessage {
    Log(String),
    /// Stream started (`true`) or ended (`false`).
    Status(bool),
    Samples(Vec<Sample>),
    Stats(StreamStats),
}
