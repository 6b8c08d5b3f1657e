/// Default gesture table for the home controller.
///
/// Rules are evaluated top to bottom and every match overwrites the previous
/// one, so when two rules fire on the same frame the later entry wins. Keep
/// the order when editing: GD0 must stay after GD1 so a spread hand with the
/// thumb out closes the door.
use crate::command::Command;
use crate::gesture::{GestureRule, Reach};
use crate::landmark::Fingertip::{Index, Middle, Pinky, Ring, Thumb};

/// Index finger must reach this far above or below the palm.
pub const INDEX_REACH: u32 = 150;

/// Middle finger reach for the "two fingers" gesture.
pub const MIDDLE_REACH: u32 = 200;

/// Pinky reach.
pub const PINKY_REACH: u32 = 135;

/// Thumb reach for the "thumb only" gesture.
pub const THUMB_REACH: u32 = 100;

pub static GESTURE_RULES: &[GestureRule] = &[
    // Index finger only
    GestureRule {
        name: "index only",
        reach: &[Reach::new(Index, INDEX_REACH)],
        agree: &[],
        folded: &[Pinky, Ring, Middle, Thumb],
        command: Command::BedroomLightOn,
    },
    // Fist
    GestureRule {
        name: "fist",
        reach: &[],
        agree: &[Thumb, Index, Middle, Ring, Pinky],
        folded: &[Thumb, Middle, Ring, Pinky],
        command: Command::BedroomLightOff,
    },
    // Index and middle ("two")
    GestureRule {
        name: "two fingers",
        reach: &[Reach::new(Middle, MIDDLE_REACH)],
        agree: &[],
        folded: &[Pinky, Ring, Thumb],
        command: Command::GarageLightOn,
    },
    // Pinky only
    GestureRule {
        name: "pinky only",
        reach: &[Reach::new(Pinky, PINKY_REACH)],
        agree: &[],
        folded: &[Index, Ring, Middle, Thumb],
        command: Command::GarageLightOff,
    },
    // Index and pinky, middle and ring curled
    GestureRule {
        name: "horns",
        reach: &[Reach::new(Index, INDEX_REACH), Reach::new(Pinky, PINKY_REACH)],
        agree: &[],
        folded: &[Middle, Ring],
        command: Command::GarageDoorOpen,
    },
    // Thumb out, middle and ring curled
    GestureRule {
        name: "thumb out",
        reach: &[Reach::new(Thumb, THUMB_REACH)],
        agree: &[],
        folded: &[Middle, Ring],
        command: Command::GarageDoorClose,
    },
];
