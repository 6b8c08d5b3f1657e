/// Per-finger folded/extended classification.
///
/// A fingertip is folded when it sits vertically close to the palm base.
/// Thresholds are absolute pixels with no hand-size normalization, so results
/// depend on how far the subject stands from the camera.
use heapless::Vec;

use crate::landmark::{Fingertip, HandFrame};

/// Vertical pixel distance below which the thumb counts as folded.
pub const THUMB_FOLD_THRESHOLD: u32 = 100;

/// Vertical pixel distance below which any other finger counts as folded.
pub const FINGER_FOLD_THRESHOLD: u32 = 90;

/// Folded flags for a list of fingertips, in the order they were requested.
pub type FingerStates = Vec<(Fingertip, bool), 5>;

/// Fold threshold for a fingertip.
pub const fn fold_threshold(tip: Fingertip) -> u32 {
    match tip {
        Fingertip::Thumb => THUMB_FOLD_THRESHOLD,
        _ => FINGER_FOLD_THRESHOLD,
    }
}

/// Vertical distance between a fingertip and the palm base.
///
/// Exact for any pair of coordinates, including saturated ones.
#[inline]
pub fn palm_distance(hand: &HandFrame, tip: Fingertip) -> u32 {
    hand.tip(tip).y.abs_diff(hand.palm().y)
}

/// Strictly below the threshold is folded; exactly on it is extended.
#[inline]
pub fn is_folded(hand: &HandFrame, tip: Fingertip) -> bool {
    palm_distance(hand, tip) < fold_threshold(tip)
}

/// Classify each requested fingertip.
///
/// At most five fingertips are kept; further entries are ignored.
pub fn finger_states(hand: &HandFrame, tips: &[Fingertip]) -> FingerStates {
    let mut states = FingerStates::new();
    for &tip in tips {
        if states.push((tip, is_folded(hand, tip))).is_err() {
            break;
        }
    }
    states
}

/// True when every flag has the same value.
///
/// Empty input does not agree.
pub fn all_agree(states: &[(Fingertip, bool)]) -> bool {
    match states.split_first() {
        Some((&(_, first), rest)) => rest.iter().all(|&(_, folded)| folded == first),
        None => false,
    }
}

/// True when every flag agrees and the common value is `folded`.
pub fn all_folded(states: &[(Fingertip, bool)]) -> bool {
    all_agree(states) && states[0].1
}
