// src/engine.rs
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use log::{info, warn};
use crate::config::AppConfig;
use crate::protocol::{
    ByteSource, FrameProfile, Sample, SerialSource, SimulatedSource, SourceError, StreamDecoder,
    TcpSource,
};
use crate::types::{ConnectionMode, GuiCommand, StreamMessage};
const READ_BUFFER_BYTES: usize = 4096;
const STATS_INTERVAL: Duration = Duration::from_millis(500);
/// One connected stream: source, decoder and the epoch receipt times are measured from.
pub struct Session {
    source: Box<dyn ByteSource>,
    decoder: StreamDecoder,
    started_at: Instant,
    buf: Vec<u8>,
}
impl Session {
    pub fn new(source: Box<dyn ByteSource>, profile: FrameProfile) -> Self {
        Self {
            source,
            decoder: StreamDecoder::new(profile),
            started_at: Instant::now(),
            buf: vec![0; READ_BUFFER_BYTES],
        }
    }
    pub fn open(mode: ConnectionMode, config: &AppConfig) -> Result<Self, SourceError> {
        let conn = &config.connection;
        let source: Box<dyn ByteSource> = match mode {
            ConnectionMode::Tcp => Box::new(TcpSource::connect(
                &conn.host,
                conn.port,
                conn.read_timeout(),
            )?),
            ConnectionMode::Serial => Box::new(SerialSource::open(
                &conn.serial_path,
                conn.baud_rate,
                conn.read_timeout(),
            )?),
            ConnectionMode::Simulation => Box::new(SimulatedSource::new(
                config.profile,
                conn.simulation_rate_hz,
                started_seed(),
            )),
        };
        Ok(Self::new(source, config.profile))
    }
    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }
    /// Read whatever is available and decode it, stamped with seconds since connect.
    pub fn pump(&mut self) -> Result<Vec<Sample>, SourceError> {
        let n = self.source.read_chunk(&mut self.buf)?;
        if n == 0 {
            return Ok(Vec::new());
        }
        let time = self.started_at.elapsed().as_secs_f64();
        Ok(self.decoder.on_bytes(&self.buf[..n], time))
    }
}
fn started_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
/// Run the transport and decoder on their own thread. The thread exits once
/// the command sender is dropped.
pub fn spawn_thread(
    tx: Sender<StreamMessage>,
    rx_cmd: Receiver<GuiCommand>,
    config: AppConfig,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        tx.send(StreamMessage::Log("Engine ready.".to_owned())).ok();
        let mut session: Option<Session> = None;
        let mut last_stats = Instant::now();
        loop {
            // 1. commands
            let command = if session.is_some() {
                match rx_cmd.try_recv() {
                    Ok(cmd) => Some(cmd),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => break,
                }
            } else {
                match rx_cmd.recv_timeout(Duration::from_millis(50)) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            };
            match command {
                Some(GuiCommand::Connect(mode)) if session.is_none() => {
                    match Session::open(mode, &config) {
                        Ok(opened) => {
                            info!("stream started ({}, {:?} frames)", mode.label(), config.profile);
                            session = Some(opened);
                            tx.send(StreamMessage::Status(true)).ok();
                            tx.send(StreamMessage::Log(format!("Connected ({})", mode.label())))
                                .ok();
                        }
                        Err(err) => {
                            warn!("connect failed: {err}");
                            tx.send(StreamMessage::Log(format!("Connect failed: {err}")))
                                .ok();
                        }
                    }
                }
                Some(GuiCommand::Connect(_)) => {}
                Some(GuiCommand::Disconnect) => {
                    if let Some(closed) = session.take() {
                        info!("stream stopped: {:?}", closed.decoder().stats());
                        tx.send(StreamMessage::Stats(closed.decoder().stats())).ok();
                        tx.send(StreamMessage::Status(false)).ok();
                        tx.send(StreamMessage::Log("Disconnected".to_owned())).ok();
                    }
                }
                None => {}
            }
            // 2. data
            let Some(active) = session.as_mut() else {
                continue;
            };
            match active.pump() {
                Ok(samples) if samples.is_empty() => thread::sleep(Duration::from_millis(2)),
                Ok(samples) => {
                    tx.send(StreamMessage::Samples(samples)).ok();
                }
                Err(err) => {
                    warn!("stream ended: {err}");
                    tx.send(StreamMessage::Stats(active.decoder().stats())).ok();
                    tx.send(StreamMessage::Log(format!("Stream ended: {err}"))).ok();
                    tx.send(StreamMessage::Status(false)).ok();
                    session = None;
                    continue;
                }
            }
            if last_stats.elapsed() >= STATS_INTERVAL {
                tx.send(StreamMessage::Stats(active.decoder().stats())).ok();
                last_stats = Instant::now();
            }
        }
        info!("engine thread exiting");
    })
}
