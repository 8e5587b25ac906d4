use serde::{Deserialize, Serialize};
/// Display window and decimation settings shared by every channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width of the trailing display window.
    pub width_secs: f64,
    /// Points closer than this to the previous accepted point of the same
    /// channel are dropped. Firmware revisions were viewed with floors
    /// between 0.002 and 0.01 s.
    pub min_spacing_secs: f64,
    /// How far behind the window a channel may lag before a bulk purge.
    pub retention_secs: f64,
}
impl Default for WindowConfig {
    fn default() -> Self {
        // 8 s scrolling axis and a 10 ms point floor.
        WindowConfig {
            width_secs: 8.0,
            min_spacing_secs: 0.01,
            retention_secs: 2.0,
        }
    }
}
