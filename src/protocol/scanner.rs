use crate::protocol::frame::{FrameProfile, RawFrame, HEADER1};
/// What happened to the bytes of one `push` call, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Runs dropped because they were cut short or lacked the second header.
    pub spurious_runs: usize,
    /// Bytes discarded outside any run.
    pub skipped_bytes: usize,
}
/// Recovers candidate frames from an arbitrarily chunked byte stream.
///
/// `0xAA` opens a run. The run becomes a candidate once it holds exactly one
/// frame's worth of bytes; a second `0xAA` before that point abandons the run
/// and opens a new one. Whatever is left at the end of a chunk is kept as the
/// tail and completed by the next call.
#[derive(Debug)]
pub struct FrameScanner {
    profile: FrameProfile,
    tail: Vec<u8>,
    in_run: bool,
}
impl FrameScanner {
    pub fn new(profile: FrameProfile) -> Self {
        Self {
            profile,
            tail: Vec::with_capacity(profile.frame_len()),
            in_run: false,
        }
    }
    pub fn profile(&self) -> FrameProfile {
        self.profile
    }
    /// Bytes of the partial run waiting for the next arrival.
    pub fn pending(&self) -> &[u8] {
        &self.tail
    }
    /// Drop the buffered tail, e.g. when the stream ends.
    pub fn reset(&mut self) {
        self.tail.clear();
        self.in_run = false;
    }
    pub fn push(&mut self, chunk: &[u8]) -> (Vec<RawFrame>, ScanReport) {
        let frame_len = self.profile.frame_len();
        let mut frames = Vec::new();
        let mut report = ScanReport::default();
        for &byte in chunk {
            if byte == HEADER1 {
                if self.in_run && !self.tail.is_empty() {
                    report.spurious_runs += 1;
                }
                self.tail.clear();
                self.in_run = true;
                continue;
            }
            if !self.in_run {
                report.skipped_bytes += 1;
                continue;
            }
            if self.tail.is_empty() {
                if let Some(lead) = self.profile.leading_byte() {
                    if byte != lead {
                        report.spurious_runs += 1;
                        self.in_run = false;
                        continue;
                    }
                }
            }
            self.tail.push(byte);
            if self.tail.len() == frame_len {
                frames.push(RawFrame::new(std::mem::take(&mut self.tail)));
                self.tail.reserve(frame_len);
                self.in_run = false;
            }
        }
        (frames, report)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{DecodedFields, EXTENDED_FRAME_LEN, HEADER2};
    fn wire(event: u8) -> Vec<u8> {
        let bytes = DecodedFields {
            accel: [100, 200, 300],
            displacement: 7,
            velocity: -7,
            event,
        }
        .to_wire();
        assert!(!bytes[1..].contains(&HEADER1));
        bytes
    }
    #[test]
    fn finds_back_to_back_frames_in_one_chunk() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let mut chunk = wire(0);
        chunk.extend(wire(1));
        let (frames, report) = scanner.push(&chunk);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), EXTENDED_FRAME_LEN);
        assert_eq!(frames[1].as_bytes()[11], 1);
        assert_eq!(report, ScanReport::default());
        assert!(scanner.pending().is_empty());
    }
    #[test]
    fn frame_split_across_arrivals_is_completed_from_the_tail() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let packet = wire(2);
        let (first, _) = scanner.push(&packet[..5]);
        assert!(first.is_empty());
        assert_eq!(scanner.pending(), &packet[1..5]);
        let (second, _) = scanner.push(&packet[5..]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_bytes(), &packet[1..]);
    }
    #[test]
    fn repeated_delimiter_restarts_the_run() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let mut chunk = vec![HEADER1, HEADER2, 0x01, 0x02, HEADER1];
        chunk.extend(&wire(0)[1..]);
        let (frames, report) = scanner.push(&chunk);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_bytes(), &wire(0)[1..]);
        assert_eq!(report.spurious_runs, 1);
    }
    #[test]
    fn consecutive_delimiters_are_not_spurious_runs() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let mut chunk = vec![HEADER1, HEADER1];
        chunk.extend(wire(0));
        let (frames, report) = scanner.push(&chunk);
        assert_eq!(frames.len(), 1);
        assert_eq!(report.spurious_runs, 0);
    }
    #[test]
    fn run_without_second_header_is_dropped() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let (frames, report) = scanner.push(&[HEADER1, 0x10, 0x11, 0x12]);
        assert!(frames.is_empty());
        assert_eq!(report.spurious_runs, 1);
        assert_eq!(report.skipped_bytes, 2);
        assert!(scanner.pending().is_empty());
    }
    #[test]
    fn bytes_before_any_delimiter_are_skipped() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let (frames, report) = scanner.push(&[0x01, 0x02, 0x03]);
        assert!(frames.is_empty());
        assert_eq!(report.skipped_bytes, 3);
    }
    #[test]
    fn chunk_without_delimiter_extends_an_open_run() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        let packet = wire(0);
        scanner.push(&packet[..1]);
        let (frames, report) = scanner.push(&packet[1..8]);
        assert!(frames.is_empty());
        assert_eq!(report, ScanReport::default());
        assert_eq!(scanner.pending(), &packet[1..8]);
    }
    #[test]
    fn simple_profile_uses_six_byte_runs() {
        let mut scanner = FrameScanner::new(FrameProfile::Simple);
        let (frames, _) = scanner.push(&[HEADER1, 1, 0, 2, 0, 3, 0, HEADER1, 4]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_bytes(), &[1, 0, 2, 0, 3, 0]);
        assert_eq!(scanner.pending(), &[4]);
    }
    #[test]
    fn reset_drops_the_tail() {
        let mut scanner = FrameScanner::new(FrameProfile::Extended);
        scanner.push(&wire(0)[..6]);
        scanner.reset();
        assert!(scanner.pending().is_empty());
        let (frames, _) = scanner.push(&wire(0)[6..]);
        assert!(frames.is_empty());
    }
}
