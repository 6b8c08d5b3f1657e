/// NDJSON message protocol between the landmark detector, the bridge and
/// its serial console.
///
/// Frames arrive one per line from the detector. The bridge reports
/// dispatched commands and periodic status as newline-delimited JSON.
/// Uses `heapless` types for no_std/no-alloc operation.
use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::FrameConfig;
use crate::landmark::{FrameError, HandFrame, Landmark, LandmarkFrame, LANDMARK_COUNT};

/// Hands accepted per frame (the detector runs with two).
pub const MAX_HANDS: usize = 2;

/// Points accepted per hand before the landmark count is checked.
/// Larger than 21 so an oversized hand is reported as malformed.
pub const MAX_POINTS: usize = 32;

/// A detector point: `[x, y]` or `[x, y, z]`, normalized to the image.
pub type RawPoint = Vec<f32, 3>;

pub type RawHand = Vec<RawPoint, MAX_POINTS>;

/// One line of detector output.
///
/// `{"ts":17,"w":640,"h":480,"hands":[[[0.51,0.82,0.0], ...], ...]}`
#[derive(Debug, Deserialize)]
pub struct FrameMessage {
    /// Caller-owned frame counter, only used for logging.
    #[serde(default)]
    pub ts: u32,
    /// Image width in pixels; the configured width when absent.
    #[serde(default)]
    pub w: Option<u16>,
    /// Image height in pixels; the configured height when absent.
    #[serde(default)]
    pub h: Option<u16>,
    /// Detected hands, each a list of landmarks. Empty when nothing is seen.
    #[serde(default)]
    pub hands: Vec<RawHand, MAX_HANDS>,
}

/// A decoded frame with its detector timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedFrame {
    pub ts: u32,
    pub frame: LandmarkFrame,
}

impl FrameMessage {
    /// Select the primary hand and scale it to pixels.
    ///
    /// Fewer hands than the primary index means no hand.
    pub fn to_frame(&self, config: &FrameConfig) -> Result<LandmarkFrame, FrameError> {
        let Some(raw) = self.hands.get(config.primary_hand as usize) else {
            return Ok(LandmarkFrame::NoHand);
        };

        let width = self.w.unwrap_or(config.width);
        let height = self.h.unwrap_or(config.height);
        if width == 0 || height == 0 {
            return Err(FrameError::Size { width, height });
        }

        let mut points: Vec<Landmark, MAX_POINTS> = Vec::new();
        for (index, point) in raw.iter().enumerate() {
            let [x, y, ..] = point.as_slice() else {
                return Err(FrameError::Point { index });
            };
            let _ = points.push(Landmark::from_normalized(*x, *y, width, height));
        }

        HandFrame::from_points(&points).map(LandmarkFrame::Hand)
    }
}

/// Messages the bridge writes to its console.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum DeviceMessage<'a> {
    /// A command was published
    #[serde(rename = "command")]
    Command {
        /// Wire code sent to the broker
        code: &'a str,
        /// Timestamp of the frame that triggered it
        ts: u32,
    },
    /// Periodic bridge status
    #[serde(rename = "status")]
    Status {
        /// Frames received
        frames: u32,
        /// Frames with a hand in view
        hands: u32,
        /// Commands published
        sent: u32,
        /// Whether the broker connection is up
        mqtt: bool,
        /// Uptime in seconds
        uptime: u32,
        /// Firmware version
        version: &'static str,
    },
}

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Worst-case text of one `[x, y, z]` point with full-precision floats
/// (`json.dumps` style) and its separator.
const POINT_TEXT_LEN: usize = 80;

/// Maximum size of an incoming frame line: every accepted hand at full
/// precision plus the envelope, rounded up.
pub const MAX_FRAME_LEN: usize =
    (MAX_HANDS * LANDMARK_COUNT * POINT_TEXT_LEN + 256).next_power_of_two();

/// Maximum size of a serialized console message
pub const MAX_MSG_LEN: usize = 256;
