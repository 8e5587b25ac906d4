use log::debug;
use crate::protocol::scanner::FrameScanner;
use crate::protocol::{to_sample, DecodeError, FrameProfile, Sample};
/// Running counters for the decoder, shown by the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes_received: u64,
    pub frames_decoded: u64,
    pub checksum_mismatches: u64,
    pub malformed_frames: u64,
    pub spurious_runs: u64,
    /// Bytes seen outside any frame.
    pub skipped_bytes: u64,
}
/// Scanner, validator and sample conversion behind a single call.
pub struct StreamDecoder {
    scanner: FrameScanner,
    stats: StreamStats,
}
impl StreamDecoder {
    pub fn new(profile: FrameProfile) -> Self {
        Self {
            scanner: FrameScanner::new(profile),
            stats: StreamStats::default(),
        }
    }
    pub fn profile(&self) -> FrameProfile {
        self.scanner.profile()
    }
    pub fn stats(&self) -> StreamStats {
        self.stats
    }
    /// Forget any partially received frame.
    pub fn reset(&mut self) {
        self.scanner.reset();
    }
    /// Feed one arrival. Every sample decoded from it is stamped with `time`.
    pub fn on_bytes(&mut self, chunk: &[u8], time: f64) -> Vec<Sample> {
        self.stats.bytes_received += chunk.len() as u64;
        let (frames, report) = self.scanner.push(chunk);
        self.stats.spurious_runs += report.spurious_runs as u64;
        self.stats.skipped_bytes += report.skipped_bytes as u64;
        let profile = self.scanner.profile();
        let mut samples = Vec::with_capacity(frames.len());
        for frame in &frames {
            match profile.decode(frame) {
                Ok(fields) => {
                    self.stats.frames_decoded += 1;
                    samples.push(to_sample(fields, time));
                }
                Err(err @ DecodeError::ChecksumMismatch { .. }) => {
                    self.stats.checksum_mismatches += 1;
                    debug!("dropping frame: {err}");
                }
                Err(err) => {
                    self.stats.malformed_frames += 1;
                    debug!("dropping frame: {err}");
                }
            }
        }
        samples
    }
}
