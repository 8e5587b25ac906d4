use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::protocol::{DecodedFields, FrameProfile, SourceError};
/// Anything that yields the device byte stream in arbitrary chunks.
///
/// `Ok(0)` means nothing arrived yet; `Err(SourceError::Closed)` ends the stream.
pub trait ByteSource: Send {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;
}
fn read_with_timeout<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<usize, SourceError> {
    match reader.read(buf) {
        Ok(0) => Err(SourceError::Closed),
        Ok(n) => Ok(n),
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
            ) =>
        {
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}
/// TCP client to the device's access point.
pub struct TcpSource {
    stream: TcpStream,
}
impl TcpSource {
    pub fn connect(host: &str, port: u16, read_timeout: Duration) -> Result<Self, SourceError> {
        let addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, format!("no address for {host}:{port}"))
        })?;
        let stream = TcpStream::connect_timeout(&addr, Duration::from_secs(3))?;
        stream.set_read_timeout(Some(read_timeout))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }
}
impl ByteSource for TcpSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        read_with_timeout(&mut self.stream, buf)
    }
}
/// Same byte stream over a USB/serial bridge.
pub struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
}
impl SerialSource {
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, SourceError> {
        let port = serialport::new(path, baud_rate)
            .timeout(read_timeout)
            .open()?;
        Ok(Self { port })
    }
}
impl ByteSource for SerialSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        read_with_timeout(self.port.as_mut(), buf)
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Vec<u8>>,
}
impl ManualSource {
    pub fn new(chunks: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            queue: chunks.into_iter().collect(),
        }
    }
}
impl ByteSource for ManualSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let Some(mut chunk) = self.queue.pop_front() else {
            return Err(SourceError::Closed);
        };
        if chunk.len() > buf.len() {
            let rest = chunk.split_off(buf.len());
            self.queue.push_front(rest);
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}
/// Synthetic wearable: slow sway on all axes, random taps and the occasional
/// corrupted checksum. A tap carries its event code on exactly one frame; the
/// accel spike it causes lasts a few frames longer.
pub struct SimulatedSource {
    profile: FrameProfile,
    rng: StdRng,
    rate_hz: f64,
    started_at: Instant,
    emitted: u64,
    pending: VecDeque<u8>,
    /// Frames left in the current tap's accel spike.
    spike_frames: u32,
}
impl SimulatedSource {
    pub fn new(profile: FrameProfile, rate_hz: f64, seed: u64) -> Self {
        Self {
            profile,
            rng: StdRng::seed_from_u64(seed),
            rate_hz: rate_hz.max(1.0),
            started_at: Instant::now(),
            emitted: 0,
            pending: VecDeque::new(),
            spike_frames: 0,
        }
    }
    /// Next packet on the wire, delimiter included.
    pub fn next_packet(&mut self) -> Vec<u8> {
        let t = self.emitted as f64 / self.rate_hz;
        self.emitted += 1;
        let event = if self.spike_frames > 0 {
            self.spike_frames -= 1;
            0
        } else if self.rng.gen_bool(0.01) {
            self.spike_frames = self.rng.gen_range(5..20);
            self.rng.gen_range(1..=2)
        } else {
            0
        };
        let spike = if event != 0 || self.spike_frames > 0 {
            0.6
        } else {
            0.0
        };
        let axis = |phase: f64, rng: &mut StdRng| {
            let g = 0.4 * (2.0 * std::f64::consts::PI * 0.5 * t + phase).sin()
                + spike
                + rng.gen_range(-0.02..0.02);
            (g * 1.0e4) as i16
        };
        let accel = [
            axis(0.0, &mut self.rng),
            axis(2.1, &mut self.rng),
            axis(4.2, &mut self.rng),
        ];
        let fields = DecodedFields {
            accel,
            displacement: ((1.0 + (0.7 * t).sin()) * 20_000.0) as u16,
            velocity: ((0.7 * t).cos() * 14_000.0) as i16,
            event,
        };
        let mut wire = self.profile.encode(&fields).to_wire();
        if self.profile == FrameProfile::Extended && self.rng.gen_bool(0.02) {
            let last = wire.len() - 1;
            wire[last] ^= 0x01;
        }
        wire
    }
}
impl ByteSource for SimulatedSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let due = (self.started_at.elapsed().as_secs_f64() * self.rate_hz) as u64;
        while self.emitted < due && self.pending.len() < buf.len() {
            let packet = self.next_packet();
            self.pending.extend(packet);
        }
        let n = self.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
