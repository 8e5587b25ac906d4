use crate::waveform::Channel;
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    /// Seconds since stream start.
    pub time: f64,
    pub value: f64,
}
/// Owned copy of one visible channel, ready to hand to a plot.
#[derive(Debug)]
pub struct ChannelView {
    pub channel: Channel,
    /// Most recent value, shown next to the legend entry.
    pub latest: Option<f64>,
    pub points: Vec<[f64; 2]>,
}
#[derive(Debug)]
pub struct WaveformView {
    /// `[latest_time - width, latest_time]`.
    pub window: (f64, f64),
    pub channels: Vec<ChannelView>,
}
