/// Hand landmark data model.
///
/// A detector reports 21 points per hand in a fixed anatomical order. The
/// engine works in pixel space: normalized detector output is scaled by the
/// frame size before it reaches the classifier.

use core::fmt;

/// Number of landmarks in a hand frame.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// The palm-base landmark every distance is measured from.
pub const PALM: usize = WRIST;

/// A single landmark in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale a normalized detector point to pixels. Truncates toward zero.
    pub fn from_normalized(x: f32, y: f32, width: u16, height: u16) -> Self {
        Self {
            x: (x * width as f32) as i32,
            y: (y * height as f32) as i32,
        }
    }
}

/// A fingertip tracked by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingertip {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Fingertip {
    /// All fingertips, thumb first.
    pub const ALL: [Fingertip; 5] = [
        Fingertip::Thumb,
        Fingertip::Index,
        Fingertip::Middle,
        Fingertip::Ring,
        Fingertip::Pinky,
    ];

    /// Landmark index of this fingertip.
    pub const fn index(self) -> usize {
        match self {
            Fingertip::Thumb => THUMB_TIP,
            Fingertip::Index => INDEX_TIP,
            Fingertip::Middle => MIDDLE_TIP,
            Fingertip::Ring => RING_TIP,
            Fingertip::Pinky => PINKY_TIP,
        }
    }
}

/// Why a frame could not be turned into a [`LandmarkFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// A hand was reported with the wrong number of landmarks.
    Malformed { got: usize },
    /// A landmark carried fewer than two coordinates.
    Point { index: usize },
    /// The image size has no area, so points cannot be scaled.
    Size { width: u16, height: u16 },
    /// The line was not a valid frame message.
    Json,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Malformed { got } => write!(
                f,
                "malformed hand: expected {} landmarks, got {}",
                LANDMARK_COUNT, got
            ),
            FrameError::Point { index } => {
                write!(f, "landmark {} needs at least x and y", index)
            }
            FrameError::Size { width, height } => {
                write!(f, "frame size {}x{} has no area", width, height)
            }
            FrameError::Json => f.write_str("invalid frame message"),
        }
    }
}

/// The 21 landmarks of one detected hand.
///
/// Can only be built with exactly [`LANDMARK_COUNT`] points, so fingertip
/// lookups never go out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build a hand from a detector point list.
    pub fn from_points(points: &[Landmark]) -> Result<Self, FrameError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| FrameError::Malformed { got: points.len() })?;
        Ok(Self { points })
    }

    #[inline]
    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    #[inline]
    pub fn palm(&self) -> Landmark {
        self.points[PALM]
    }

    #[inline]
    pub fn tip(&self, tip: Fingertip) -> Landmark {
        self.points[tip.index()]
    }
}

/// One frame of detector output for the tracked hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkFrame {
    /// No hand in view. A valid state, not an error.
    NoHand,
    Hand(HandFrame),
}

impl LandmarkFrame {
    pub fn hand(&self) -> Option<&HandFrame> {
        match self {
            LandmarkFrame::NoHand => None,
            LandmarkFrame::Hand(hand) => Some(hand),
        }
    }
}
