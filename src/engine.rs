/// Per-frame gesture pipeline: match, debounce, dispatch.
///
/// The engine owns the session's [`GestureState`] (through its debouncer) and
/// a [`CommandSink`] supplied at construction. Frames must be fed in order
/// from a single thread.
use crate::command::Command;
use crate::debounce::{CommandDebouncer, GestureState};
use crate::gesture::{GestureMatcher, GestureRule};
use crate::landmark::LandmarkFrame;

/// Destination for dispatched commands.
///
/// Fire-and-forget: the engine calls `publish` once per accepted change and
/// never retries. Delivery failures are the sink's to handle.
pub trait CommandSink {
    fn publish(&mut self, command: Command);
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn publish(&mut self, command: Command) {
        (**self).publish(command)
    }
}

/// Frame counters, wrapping on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// All frames processed, including empty ones.
    pub frames: u32,
    /// Frames with a hand in view.
    pub hands: u32,
    /// Commands handed to the sink.
    pub published: u32,
}

pub struct GestureEngine<S> {
    matcher: GestureMatcher,
    debouncer: CommandDebouncer,
    sink: S,
    stats: EngineStats,
}

impl<S: CommandSink> GestureEngine<S> {
    pub fn new(sink: S) -> Self {
        Self::with_matcher(GestureMatcher::new(), sink)
    }

    pub fn with_rules(rules: &'static [GestureRule], sink: S) -> Self {
        Self::with_matcher(GestureMatcher::with_rules(rules), sink)
    }

    pub fn with_matcher(matcher: GestureMatcher, sink: S) -> Self {
        Self {
            matcher,
            debouncer: CommandDebouncer::new(),
            sink,
            stats: EngineStats::default(),
        }
    }

    /// Run one frame through the pipeline.
    ///
    /// Returns the command published to the sink, if any. Frames without a
    /// hand leave the gesture state untouched. A change to `Command::None`
    /// is recorded, so the same gesture fires again after a pause, but is
    /// not published since it has no wire code.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Option<Command> {
        self.stats.frames = self.stats.frames.wrapping_add(1);

        let hand = frame.hand()?;
        self.stats.hands = self.stats.hands.wrapping_add(1);

        let changed = self.debouncer.accept(self.matcher.command(hand))?;
        let Some(code) = changed.code() else {
            log::debug!("Gesture released");
            return None;
        };

        log::info!("Dispatching {} ({})", code, changed);
        self.sink.publish(changed);
        self.stats.published = self.stats.published.wrapping_add(1);
        Some(changed)
    }

    pub fn state(&self) -> &GestureState {
        self.debouncer.state()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Start a new session: the next gesture is always dispatched.
    pub fn reset(&mut self) {
        self.debouncer.reset();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Fingertip, HandFrame, Landmark, LANDMARK_COUNT};

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<Command>,
    }

    impl CommandSink for RecordingSink {
        fn publish(&mut self, command: Command) {
            self.sent.push(command);
        }
    }

    fn frame(thumb: i32, index: i32, middle: i32, ring: i32, pinky: i32) -> LandmarkFrame {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (tip, y) in Fingertip::ALL.iter().zip([thumb, index, middle, ring, pinky]) {
            points[tip.index()] = Landmark::new(0, y);
        }
        LandmarkFrame::Hand(HandFrame::new(points))
    }

    fn index_only() -> LandmarkFrame {
        frame(80, 160, 80, 80, 80)
    }

    fn fist() -> LandmarkFrame {
        frame(50, 50, 50, 50, 50)
    }

    fn open_hand() -> LandmarkFrame {
        frame(95, 300, 300, 300, 300)
    }

    #[test]
    fn held_gesture_publishes_once() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        assert_eq!(engine.process(&index_only()), Some(Command::BedroomLightOn));
        assert_eq!(engine.process(&index_only()), None);
        assert_eq!(engine.sink().sent, [Command::BedroomLightOn]);

        assert_eq!(engine.process(&fist()), Some(Command::BedroomLightOff));
        assert_eq!(
            engine.sink().sent,
            [Command::BedroomLightOn, Command::BedroomLightOff]
        );
    }

    #[test]
    fn alternating_gestures_publish_every_frame() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        for _ in 0..3 {
            engine.process(&index_only());
            engine.process(&fist());
        }
        assert_eq!(engine.sink().sent.len(), 6);
    }

    #[test]
    fn no_hand_leaves_state_and_sink_alone() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        engine.process(&index_only());
        let before = *engine.state();

        assert_eq!(engine.process(&LandmarkFrame::NoHand), None);
        assert_eq!(*engine.state(), before);
        assert_eq!(engine.sink().sent.len(), 1);

        // Hand returns with the same gesture: still debounced
        assert_eq!(engine.process(&index_only()), None);
    }

    #[test]
    fn no_hand_on_fresh_engine_keeps_initial_state() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        engine.process(&LandmarkFrame::NoHand);
        assert_eq!(*engine.state(), GestureState::new());
    }

    #[test]
    fn release_is_recorded_but_not_published() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        engine.process(&index_only());
        assert_eq!(engine.process(&open_hand()), None);
        assert_eq!(engine.state().previous, Some(Command::None));
        assert_eq!(engine.sink().sent, [Command::BedroomLightOn]);

        // Same gesture after a pause is a new command
        assert_eq!(engine.process(&index_only()), Some(Command::BedroomLightOn));
        assert_eq!(engine.sink().sent.len(), 2);
    }

    #[test]
    fn stats_count_frames_hands_and_publishes() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        engine.process(&LandmarkFrame::NoHand);
        engine.process(&index_only());
        engine.process(&index_only());
        engine.process(&open_hand());
        assert_eq!(
            engine.stats(),
            EngineStats {
                frames: 4,
                hands: 3,
                published: 1
            }
        );
    }

    #[test]
    fn reset_dispatches_held_gesture_again() {
        let mut engine = GestureEngine::new(RecordingSink::default());
        engine.process(&fist());
        engine.reset();
        assert_eq!(engine.process(&fist()), Some(Command::BedroomLightOff));
    }

    #[test]
    fn custom_rules_drive_dispatch() {
        static RULES: &[GestureRule] = &[GestureRule {
            name: "ring curled",
            reach: &[],
            agree: &[],
            folded: &[Fingertip::Ring],
            command: Command::GarageDoorOpen,
        }];
        let mut engine = GestureEngine::with_rules(RULES, RecordingSink::default());
        assert_eq!(engine.process(&open_hand()), None);
        assert_eq!(engine.process(&fist()), Some(Command::GarageDoorOpen));
    }

    #[test]
    fn borrowed_sink_receives_commands() {
        let mut sink = RecordingSink::default();
        {
            let mut engine = GestureEngine::new(&mut sink);
            engine.process(&fist());
        }
        assert_eq!(sink.sent, [Command::BedroomLightOff]);
    }
}
