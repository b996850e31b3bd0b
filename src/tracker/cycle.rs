use serde::{Deserialize, Serialize};

use crate::pose::LandmarkIndex;

/// 左右どちらの肢か
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbSide {
    Left,
    Right,
}

impl LimbSide {
    pub const BOTH: [LimbSide; 2] = [LimbSide::Left, LimbSide::Right];

    pub fn label(self) -> &'static str {
        match self {
            LimbSide::Left => "L",
            LimbSide::Right => "R",
        }
    }

    pub fn shoulder(self) -> LandmarkIndex {
        match self {
            LimbSide::Left => LandmarkIndex::LeftShoulder,
            LimbSide::Right => LandmarkIndex::RightShoulder,
        }
    }

    pub fn wrist(self) -> LandmarkIndex {
        match self {
            LimbSide::Left => LandmarkIndex::LeftWrist,
            LimbSide::Right => LandmarkIndex::RightWrist,
        }
    }

    pub fn hip(self) -> LandmarkIndex {
        match self {
            LimbSide::Left => LandmarkIndex::LeftHip,
            LimbSide::Right => LandmarkIndex::RightHip,
        }
    }

    pub fn knee(self) -> LandmarkIndex {
        match self {
            LimbSide::Left => LandmarkIndex::LeftKnee,
            LimbSide::Right => LandmarkIndex::RightKnee,
        }
    }

    pub fn ankle(self) -> LandmarkIndex {
        match self {
            LimbSide::Left => LandmarkIndex::LeftAnkle,
            LimbSide::Right => LandmarkIndex::RightAnkle,
        }
    }
}

/// 1サイクル内の位相
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    /// トリガー待ち
    #[default]
    Ready,
    /// トリガー済み、リリースでカウント
    Armed,
}

/// クールダウン付きレップカウンタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepCounter {
    count: u32,
    /// 最後にカウントした時刻（ms）。未カウントなら None
    last_rep_ms: Option<u64>,
}

impl RepCounter {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_rep_ms(&self) -> Option<u64> {
        self.last_rep_ms
    }

    /// 前回カウントから `cooldown_ms` を厳密に超えているか
    pub fn cooldown_elapsed(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_rep_ms {
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
            None => true,
        }
    }

    /// クールダウン経過後なら1回カウントして true
    pub fn try_increment(&mut self, now_ms: u64, cooldown_ms: u64) -> bool {
        if !self.cooldown_elapsed(now_ms, cooldown_ms) {
            return false;
        }
        self.count += 1;
        self.last_rep_ms = Some(now_ms);
        true
    }
}

/// 片側の肢の状態（位相 + カウンタ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimbState {
    phase: CyclePhase,
    counter: RepCounter,
}

impl LimbState {
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.phase == CyclePhase::Armed
    }

    pub fn count(&self) -> u32 {
        self.counter.count()
    }

    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    /// 1フレーム分の遷移。カウントした場合 true
    ///
    /// Armed はカウントが成立したときだけ Ready に戻る。クールダウン中の
    /// リリースでは Armed のまま残り、クールダウン明けの次のリリースで
    /// カウントされる。
    pub fn advance(&mut self, trigger: bool, release: bool, now_ms: u64, cooldown_ms: u64) -> bool {
        if trigger {
            self.phase = CyclePhase::Armed;
        }
        if release && self.is_armed() && self.counter.try_increment(now_ms, cooldown_ms) {
            self.phase = CyclePhase::Ready;
            return true;
        }
        false
    }
}
