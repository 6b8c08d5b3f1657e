/// Ordered gesture rule evaluation.
///
/// Each rule gates on fingertip reach (vertical distance from the palm) and
/// then checks that a set of fingers is folded. All rules are evaluated on
/// every frame and the **last** matching rule decides the command. This is
/// not first-match-wins: rules later in the table override earlier ones.
use crate::command::Command;
use crate::defaults::GESTURE_RULES;
use crate::finger::{all_agree, all_folded, finger_states, palm_distance};
use crate::landmark::{Fingertip, HandFrame};

/// Minimum palm distance a fingertip must reach (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reach {
    pub tip: Fingertip,
    pub min: u32,
}

impl Reach {
    pub const fn new(tip: Fingertip, min: u32) -> Self {
        Self { tip, min }
    }

    #[inline]
    pub fn reached(&self, hand: &HandFrame) -> bool {
        palm_distance(hand, self.tip) >= self.min
    }
}

/// A named gesture and the command it triggers.
#[derive(Debug, Clone, Copy)]
pub struct GestureRule {
    /// Human-readable gesture name for logs.
    pub name: &'static str,
    /// Every entry must be reached.
    pub reach: &'static [Reach],
    /// Fingertips whose folded flags must all be equal. Skipped when empty.
    pub agree: &'static [Fingertip],
    /// Fingertips that must all be folded.
    pub folded: &'static [Fingertip],
    pub command: Command,
}

impl GestureRule {
    pub fn matches(&self, hand: &HandFrame) -> bool {
        if !self.reach.iter().all(|r| r.reached(hand)) {
            return false;
        }
        if !self.agree.is_empty() && !all_agree(&finger_states(hand, self.agree)) {
            return false;
        }
        all_folded(&finger_states(hand, self.folded))
    }
}

/// Evaluates a rule table against hand frames. Stateless.
#[derive(Debug, Clone, Copy)]
pub struct GestureMatcher {
    rules: &'static [GestureRule],
}

impl GestureMatcher {
    /// Matcher over the compiled-in [`GESTURE_RULES`].
    pub fn new() -> Self {
        Self {
            rules: GESTURE_RULES,
        }
    }

    pub const fn with_rules(rules: &'static [GestureRule]) -> Self {
        Self { rules }
    }

    /// Find the rule that decides this frame: the last one that matches.
    pub fn evaluate(&self, hand: &HandFrame) -> Option<&'static GestureRule> {
        let mut winner = None;
        for rule in self.rules {
            if rule.matches(hand) {
                log::debug!("Gesture '{}' matched", rule.name);
                winner = Some(rule);
            }
        }
        winner
    }

    /// Command for this frame, `Command::None` if no rule matches.
    pub fn command(&self, hand: &HandFrame) -> Command {
        self.evaluate(hand)
            .map(|rule| rule.command)
            .unwrap_or(Command::None)
    }
}

impl Default for GestureMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    /// Palm at y=0, fingertips at the given heights.
    fn hand(thumb: i32, index: i32, middle: i32, ring: i32, pinky: i32) -> HandFrame {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (tip, y) in Fingertip::ALL.iter().zip([thumb, index, middle, ring, pinky]) {
            points[tip.index()] = Landmark::new(0, y);
        }
        HandFrame::new(points)
    }

    fn command(hand: &HandFrame) -> Command {
        GestureMatcher::new().command(hand)
    }

    #[test]
    fn index_only_turns_bedroom_light_on() {
        // Index at 160, everything else within 80 of the palm
        let h = hand(80, 160, 80, 80, 80);
        assert_eq!(command(&h), Command::BedroomLightOn);
    }

    #[test]
    fn fist_turns_bedroom_light_off() {
        let h = hand(95, 85, 60, 40, 20);
        assert_eq!(command(&h), Command::BedroomLightOff);
    }

    #[test]
    fn two_fingers_turn_garage_light_on() {
        let h = hand(50, 180, 210, 40, 40);
        assert_eq!(command(&h), Command::GarageLightOn);
    }

    #[test]
    fn middle_and_index_raised_resolves_to_garage_light() {
        // Index gate (160 >= 150) and middle gate (210 >= 200) both hold
        let h = hand(80, 160, 210, 80, 80);
        let matcher = GestureMatcher::new();
        assert_eq!(matcher.command(&h), Command::GarageLightOn);
        assert_eq!(matcher.evaluate(&h).map(|r| r.name), Some("two fingers"));
    }

    #[test]
    fn pinky_only_turns_garage_light_off() {
        let h = hand(30, 30, 30, 30, 140);
        assert_eq!(command(&h), Command::GarageLightOff);
    }

    #[test]
    fn horns_open_garage_door() {
        let h = hand(30, 170, 30, 30, 150);
        assert_eq!(command(&h), Command::GarageDoorOpen);
    }

    #[test]
    fn thumb_out_closes_garage_door() {
        let h = hand(120, 30, 30, 30, 30);
        assert_eq!(command(&h), Command::GarageDoorClose);
    }

    #[test]
    fn later_rule_wins_when_two_rules_match() {
        // Horns with the thumb out: both "horns" and "thumb out" fire
        let h = hand(120, 170, 30, 30, 150);
        assert!(GESTURE_RULES[4].matches(&h));
        assert!(GESTURE_RULES[5].matches(&h));
        assert_eq!(command(&h), Command::GarageDoorClose);
    }

    #[test]
    fn reach_on_threshold_counts() {
        let h = hand(80, 150, 80, 80, 80);
        assert_eq!(command(&h), Command::BedroomLightOn);
    }

    #[test]
    fn reach_one_pixel_short_does_not_count() {
        // Index at 149 is neither folded nor far enough
        let h = hand(80, 149, 80, 80, 80);
        assert_eq!(command(&h), Command::None);
    }

    #[test]
    fn fold_threshold_is_strict_inside_rules() {
        // Ring exactly on its fold threshold is extended, so index-only fails
        let h = hand(80, 160, 80, 90, 80);
        assert_eq!(command(&h), Command::None);
    }

    #[test]
    fn open_hand_matches_nothing() {
        let h = hand(95, 300, 300, 300, 300);
        assert_eq!(command(&h), Command::None);
        assert!(GestureMatcher::new().evaluate(&h).is_none());
    }

    #[test]
    fn hand_below_palm_uses_absolute_distance() {
        // Camera-space y grows downward; reach works in both directions
        let h = hand(-80, -160, -80, -80, -80);
        assert_eq!(command(&h), Command::BedroomLightOn);
    }

    #[test]
    fn custom_table_uses_last_match() {
        static RULES: &[GestureRule] = &[
            GestureRule {
                name: "first",
                reach: &[],
                agree: &[],
                folded: &[Fingertip::Ring],
                command: Command::GarageLightOn,
            },
            GestureRule {
                name: "second",
                reach: &[],
                agree: &[],
                folded: &[Fingertip::Ring],
                command: Command::GarageLightOff,
            },
        ];
        let matcher = GestureMatcher::with_rules(RULES);
        let h = hand(0, 0, 0, 0, 0);
        assert_eq!(matcher.command(&h), Command::GarageLightOff);
    }

    #[test]
    fn empty_table_yields_none() {
        let matcher = GestureMatcher::with_rules(&[]);
        assert_eq!(matcher.command(&hand(0, 0, 0, 0, 0)), Command::None);
    }
}
