pub mod buffer;
pub mod channel;
pub mod config;
pub mod rate;
pub mod view;
pub use channel::{Channel, WindowedChannelBuffer, EVENT_MARKER_AMPLITUDE};
pub use config::WindowConfig;
pub use rate::{EventRate, RateEstimator};
pub use view::{ChannelView, SamplePoint, WaveformView};
