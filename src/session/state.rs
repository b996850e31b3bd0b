use chrono::{DateTime, Utc};

use super::display::DisplayPayload;
use super::record::SessionRecord;
use crate::config::CounterConfig;
use crate::pose::{LandmarkGate, PoseFrame};
use crate::tracker::{classify, ExerciseKind, LimbSide, LimbState, Readings};

/// 1トラッキングセッションの全状態
///
/// `Copy` な値として各フレームの処理に渡し、新しい状態を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    exercise: ExerciseKind,
    left: LimbState,
    right: LimbState,
}

impl SessionState {
    pub fn new(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            left: LimbState::default(),
            right: LimbState::default(),
        }
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn limb(&self, side: LimbSide) -> &LimbState {
        match side {
            LimbSide::Left => &self.left,
            LimbSide::Right => &self.right,
        }
    }

    pub fn count(&self, side: LimbSide) -> u32 {
        self.limb(side).count()
    }

    /// 全カウンタ・位相・クールダウンをゼロに戻す
    pub fn reset(self) -> (Self, DisplayPayload) {
        (Self::new(self.exercise), DisplayPayload::initial(self.exercise))
    }

    /// 1フレームを処理する
    ///
    /// 信号不足のフレームでは状態を変えずにガイド表示だけを返す。
    pub fn process_frame(
        self,
        frame: &PoseFrame,
        now_ms: u64,
        config: &CounterConfig,
    ) -> (Self, DisplayPayload) {
        let gate = LandmarkGate::new(config.min_confidence);
        let readings = match classify(self.exercise, frame, &gate) {
            Ok(readings) => readings,
            Err(issue) => return (self, DisplayPayload::for_issue(self.exercise, issue)),
        };

        let cooldown_ms = config.cooldown_ms;
        let mut next = self;
        let payload = match readings {
            Readings::Single(arm) => {
                next.right.advance(arm.trigger, arm.release, now_ms, cooldown_ms);
                DisplayPayload::for_arm(next.right.count(), arm.angle, arm.release)
            }
            Readings::Bilateral { left, right } => {
                next.left.advance(left.trigger, left.release, now_ms, cooldown_ms);
                next.right.advance(right.trigger, right.release, now_ms, cooldown_ms);
                DisplayPayload::for_sides(
                    self.exercise,
                    (&next.left, left.angle),
                    (&next.right, right.angle),
                )
            }
        };
        (next, payload)
    }

    /// 永続化用の記録。腕上げのカウントは右側として記録する
    pub fn record(&self, timestamp: DateTime<Utc>) -> SessionRecord {
        let left_reps = match self.exercise {
            ExerciseKind::ArmRaises => 0,
            _ => self.left.count(),
        };
        SessionRecord {
            exercise_type: self.exercise,
            left_reps,
            right_reps: self.right.count(),
            timestamp,
        }
    }
}

/// 表示中のセッション。状態と最新の表示を保持する
pub struct RepSession {
    state: SessionState,
    config: CounterConfig,
    display: DisplayPayload,
}

impl RepSession {
    pub fn new(exercise: ExerciseKind, config: CounterConfig) -> Self {
        Self {
            state: SessionState::new(exercise),
            config,
            display: DisplayPayload::initial(exercise),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.state.exercise()
    }

    /// 最後に生成した表示
    pub fn display(&self) -> &DisplayPayload {
        &self.display
    }

    /// 種目を切り替えて全リセット
    pub fn select_exercise(&mut self, exercise: ExerciseKind) -> &DisplayPayload {
        self.state = SessionState::new(exercise);
        self.reset()
    }

    pub fn reset(&mut self) -> &DisplayPayload {
        let (state, display) = self.state.reset();
        self.state = state;
        self.display = display;
        &self.display
    }

    pub fn process(&mut self, frame: &PoseFrame, now_ms: u64) -> &DisplayPayload {
        let (state, display) = self.state.process_frame(frame, now_ms, &self.config);
        self.state = state;
        self.display = display;
        &self.display
    }

    pub fn record(&self, timestamp: DateTime<Utc>) -> SessionRecord {
        self.state.record(timestamp)
    }
}
