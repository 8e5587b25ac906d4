use serde::{Deserialize, Serialize};
use crate::protocol::Sample;
use super::{
    buffer::SampleBuffer,
    config::WindowConfig,
    view::{ChannelView, SamplePoint, WaveformView},
};
/// Plot height of an active event marker.
pub const EVENT_MARKER_AMPLITUDE: f64 = 5.0;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    AccelX,
    AccelY,
    AccelZ,
    AccelMagnitude,
    Displacement,
    Velocity,
    /// Step signal raised while the device reports event class 1.
    EventMarkerA,
    /// Step signal raised while the device reports event class 2.
    EventMarkerB,
}
impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::AccelMagnitude,
        Channel::Displacement,
        Channel::Velocity,
        Channel::EventMarkerA,
        Channel::EventMarkerB,
    ];
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn label(self) -> &'static str {
        match self {
            Channel::AccelX => "Accel X",
            Channel::AccelY => "Accel Y",
            Channel::AccelZ => "Accel Z",
            Channel::AccelMagnitude => "Accel |a|",
            Channel::Displacement => "Displacement",
            Channel::Velocity => "Velocity",
            Channel::EventMarkerA => "Event 1",
            Channel::EventMarkerB => "Event 2",
        }
    }
    /// Magnitude and velocity start hidden.
    pub fn default_visible(self) -> bool {
        !matches!(self, Channel::AccelMagnitude | Channel::Velocity)
    }
    pub fn is_event_marker(self) -> bool {
        matches!(self, Channel::EventMarkerA | Channel::EventMarkerB)
    }
    /// Value this channel takes for `sample`.
    pub fn value_of(self, sample: &Sample) -> f64 {
        match self {
            Channel::AccelX => sample.accel[0],
            Channel::AccelY => sample.accel[1],
            Channel::AccelZ => sample.accel[2],
            Channel::AccelMagnitude => sample.accel_magnitude,
            Channel::Displacement => sample.displacement,
            Channel::Velocity => sample.velocity,
            Channel::EventMarkerA if sample.event == 1 => EVENT_MARKER_AMPLITUDE,
            Channel::EventMarkerB if sample.event == 2 => EVENT_MARKER_AMPLITUDE,
            Channel::EventMarkerA | Channel::EventMarkerB => 0.0,
        }
    }
}
struct ChannelState {
    channel: Channel,
    visible: bool,
    buffer: SampleBuffer,
}
impl ChannelState {
    fn new(channel: Channel, config: &WindowConfig) -> Self {
        let capacity = if config.min_spacing_secs > 0.0 {
            ((config.width_secs + config.retention_secs) / config.min_spacing_secs).ceil() as usize
        } else {
            1024
        };
        Self {
            channel,
            visible: channel.default_visible(),
            buffer: SampleBuffer::new(config.min_spacing_secs, capacity.min(1 << 16) + 8),
        }
    }
    fn view(&self, from: f64) -> Option<ChannelView> {
        if !self.visible {
            return None;
        }
        let points: Vec<[f64; 2]> = self
            .buffer
            .since(from)
            .map(|p| [p.time, p.value])
            .collect();
        if points.is_empty() {
            return None;
        }
        Some(ChannelView {
            channel: self.channel,
            latest: points.last().map(|p| p[1]),
            points,
        })
    }
}
/// Per-channel rolling store behind the live plot.
///
/// Single writer: `ingest`, `set_visible` and the setters are not synchronized.
pub struct WindowedChannelBuffer {
    config: WindowConfig,
    channels: Vec<ChannelState>,
    latest_time: Option<f64>,
}
impl WindowedChannelBuffer {
    pub fn new(config: WindowConfig) -> Self {
        let channels = Channel::ALL
            .iter()
            .map(|&channel| ChannelState::new(channel, &config))
            .collect();
        Self {
            config,
            channels,
            latest_time: None,
        }
    }
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
    pub fn latest_time(&self) -> Option<f64> {
        self.latest_time
    }
    /// `[latest_time - width, latest_time]`, or `None` before the first sample.
    pub fn window(&self) -> Option<(f64, f64)> {
        self.latest_time
            .map(|latest| (latest - self.config.width_secs, latest))
    }
    /// Record `sample` on every channel, subject to each channel's spacing floor.
    pub fn ingest(&mut self, sample: &Sample) {
        let latest = self
            .latest_time
            .map_or(sample.time, |t| t.max(sample.time));
        self.latest_time = Some(latest);
        let cutoff = latest - self.config.width_secs;
        for state in &mut self.channels {
            state.buffer.push(SamplePoint {
                time: sample.time,
                value: state.channel.value_of(sample),
            });
            state.buffer.prune(cutoff, self.config.retention_secs);
        }
    }
    /// Record one arrival. Samples decoded from the same read share a receipt
    /// time, so only the newest of them is plotted.
    pub fn ingest_arrival(&mut self, samples: &[Sample]) {
        if let Some(newest) = samples.last() {
            self.ingest(newest);
        }
    }
    pub fn set_visible(&mut self, channel: Channel, visible: bool) {
        self.channels[channel.index()].visible = visible;
    }
    pub fn is_visible(&self, channel: Channel) -> bool {
        self.channels[channel.index()].visible
    }
    /// Points of `channel` inside the display window, oldest first. Empty
    /// while the channel is hidden. The iterator can be cloned to walk it again.
    pub fn visible_points(
        &self,
        channel: Channel,
    ) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        let state = &self.channels[channel.index()];
        let points = match self.window() {
            Some((from, _)) if state.visible => state.buffer.since(from),
            _ => state.buffer.none(),
        };
        points.map(|p| (p.time, p.value))
    }
    /// Number of stored points, including ones outside the window awaiting purge.
    pub fn stored_len(&self, channel: Channel) -> usize {
        self.channels[channel.index()].buffer.len()
    }
    pub fn set_window_width(&mut self, width_secs: f64) {
        self.config.width_secs = width_secs.max(0.1);
    }
    pub fn set_min_spacing(&mut self, min_spacing_secs: f64) {
        self.config.min_spacing_secs = min_spacing_secs.max(0.0);
        for state in &mut self.channels {
            state.buffer.set_min_spacing(min_spacing_secs);
        }
    }
    /// Drop all stored points, keeping visibility.
    pub fn clear(&mut self) {
        for state in &mut self.channels {
            state.buffer.clear();
        }
        self.latest_time = None;
    }
    /// Snapshot of all visible, non-empty channels.
    pub fn view(&self) -> WaveformView {
        let window = self.window().unwrap_or((-self.config.width_secs, 0.0));
        let channels = self
            .channels
            .iter()
            .filter_map(|state| state.view(window.0))
            .collect();
        WaveformView { window, channels }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{to_sample, DecodedFields, FrameProfile, StreamDecoder};
    fn sample_at(time: f64, event: u8) -> Sample {
        to_sample(
            DecodedFields {
                accel: [1_000, -2_000, 3_000],
                displacement: 100,
                velocity: -100,
                event,
            },
            time,
        )
    }
    fn buffer() -> WindowedChannelBuffer {
        WindowedChannelBuffer::new(WindowConfig {
            width_secs: 8.0,
            min_spacing_secs: 0.01,
            retention_secs: 2.0,
        })
    }
    #[test]
    fn window_keeps_only_trailing_width() {
        let mut buffer = buffer();
        for i in 0..=40 {
            buffer.ingest(&sample_at(i as f64 * 0.5, 0));
        }
        let times: Vec<f64> = buffer.visible_points(Channel::AccelX).map(|p| p.0).collect();
        assert_eq!(times.first(), Some(&12.0));
        assert_eq!(times.last(), Some(&20.0));
        assert_eq!(times.len(), 17);
        assert!(times.iter().all(|t| (12.0..=20.0).contains(t)));
        assert_eq!(buffer.window(), Some((12.0, 20.0)));
    }
    #[test]
    fn purge_never_touches_the_window_and_bounds_memory() {
        let mut buffer = buffer();
        for i in 0..=400 {
            buffer.ingest(&sample_at(i as f64 * 0.05, 0));
            let (from, _) = buffer.window().unwrap();
            let expected = (0..=i).filter(|j| *j as f64 * 0.05 >= from).count();
            assert_eq!(buffer.visible_points(Channel::AccelY).count(), expected);
        }
        // 8 s window plus at most 2 s of retention at 20 points per second.
        assert!(buffer.stored_len(Channel::AccelY) <= 201 + 41);
    }
    #[test]
    fn close_samples_are_decimated_per_channel() {
        let mut buffer = buffer();
        buffer.ingest(&sample_at(0.0, 0));
        buffer.ingest(&sample_at(0.0005, 0));
        for channel in Channel::ALL {
            assert_eq!(buffer.stored_len(channel), 1);
        }
        buffer.ingest(&sample_at(0.02, 0));
        assert_eq!(buffer.stored_len(Channel::AccelZ), 2);
    }
    #[test]
    fn hidden_channel_keeps_recording() {
        let mut buffer = buffer();
        buffer.set_visible(Channel::AccelX, false);
        for i in 0..10 {
            buffer.ingest(&sample_at(i as f64 * 0.1, 0));
        }
        assert_eq!(buffer.visible_points(Channel::AccelX).count(), 0);
        assert_eq!(buffer.stored_len(Channel::AccelX), 10);
        buffer.set_visible(Channel::AccelX, true);
        assert_eq!(buffer.visible_points(Channel::AccelX).count(), 10);
    }
    #[test]
    fn default_visibility_hides_magnitude_and_velocity() {
        let buffer = buffer();
        assert!(buffer.is_visible(Channel::AccelX));
        assert!(buffer.is_visible(Channel::EventMarkerA));
        assert!(!buffer.is_visible(Channel::AccelMagnitude));
        assert!(!buffer.is_visible(Channel::Velocity));
    }
    #[test]
    fn event_markers_form_a_step_signal() {
        let mut buffer = buffer();
        buffer.ingest(&sample_at(0.0, 0));
        buffer.ingest(&sample_at(0.1, 1));
        buffer.ingest(&sample_at(0.2, 2));
        buffer.ingest(&sample_at(0.3, 7));
        let a: Vec<f64> = buffer.visible_points(Channel::EventMarkerA).map(|p| p.1).collect();
        let b: Vec<f64> = buffer.visible_points(Channel::EventMarkerB).map(|p| p.1).collect();
        assert_eq!(a, vec![0.0, 5.0, 0.0, 0.0]);
        assert_eq!(b, vec![0.0, 0.0, 5.0, 0.0]);
    }
    #[test]
    fn visible_points_can_be_replayed() {
        let mut buffer = buffer();
        for i in 0..5 {
            buffer.ingest(&sample_at(i as f64, 0));
        }
        let points = buffer.visible_points(Channel::Displacement);
        let again = points.clone();
        assert_eq!(points.count(), again.count());
    }
    #[test]
    fn out_of_order_sample_does_not_move_the_window_back() {
        let mut buffer = buffer();
        buffer.ingest(&sample_at(10.0, 0));
        buffer.ingest(&sample_at(9.0, 0));
        assert_eq!(buffer.latest_time(), Some(10.0));
        assert_eq!(buffer.stored_len(Channel::AccelX), 1);
    }
    #[test]
    fn view_lists_visible_channels_only() {
        let mut buffer = buffer();
        buffer.ingest(&sample_at(1.0, 0));
        buffer.ingest(&sample_at(2.0, 0));
        let view = buffer.view();
        assert_eq!(view.window, (-6.0, 2.0));
        assert!(view.channels.iter().all(|c| c.channel.default_visible()));
        let x = view
            .channels
            .iter()
            .find(|c| c.channel == Channel::AccelX)
            .unwrap();
        assert_eq!(x.points.len(), 2);
        assert_eq!(x.latest, Some(0.1));
    }
    #[test]
    fn narrowing_the_window_hides_older_points() {
        let mut buffer = buffer();
        for i in 0..=10 {
            buffer.ingest(&sample_at(i as f64, 0));
        }
        assert_eq!(buffer.visible_points(Channel::AccelX).count(), 9);
        buffer.set_window_width(2.0);
        let times: Vec<f64> = buffer.visible_points(Channel::AccelX).map(|p| p.0).collect();
        assert_eq!(times, vec![8.0, 9.0, 10.0]);
    }
    #[test]
    fn spacing_floor_can_be_tightened() {
        let mut buffer = buffer();
        buffer.set_min_spacing(0.002);
        buffer.ingest(&sample_at(0.0, 0));
        buffer.ingest(&sample_at(0.005, 0));
        assert_eq!(buffer.stored_len(Channel::AccelX), 2);
        buffer.clear();
        assert_eq!(buffer.latest_time(), None);
        assert_eq!(buffer.visible_points(Channel::AccelX).count(), 0);
    }
    #[test]
    fn arrival_plots_its_newest_sample() {
        let mut buffer = buffer();
        let mut bytes = Vec::new();
        for event in [0, 1, 1] {
            bytes.extend(
                DecodedFields {
                    accel: [1_000 * (event as i16 + 1), 0, 0],
                    event,
                    ..DecodedFields::default()
                }
                .to_wire(),
            );
        }
        let mut decoder = StreamDecoder::new(FrameProfile::Extended);
        let arrival = decoder.on_bytes(&bytes, 1.0);
        assert_eq!(arrival.len(), 3);
        buffer.ingest_arrival(&arrival);
        let marker: Vec<(f64, f64)> = buffer.visible_points(Channel::EventMarkerA).collect();
        assert_eq!(marker, vec![(1.0, EVENT_MARKER_AMPLITUDE)]);
        let x: Vec<(f64, f64)> = buffer.visible_points(Channel::AccelX).collect();
        assert_eq!(x, vec![(1.0, 0.2)]);
        buffer.ingest_arrival(&[]);
        assert_eq!(buffer.stored_len(Channel::AccelX), 1);
    }
}
