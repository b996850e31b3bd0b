use thiserror::Error;

use super::keypoint::{Keypoint, LandmarkIndex, PoseFrame};

/// フレームを分類に使えない理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalIssue {
    #[error("no person detected")]
    NoPersonDetected,
    #[error("landmark {0:?} missing or below confidence threshold")]
    InsufficientSignal(LandmarkIndex),
    #[error("degenerate joint geometry")]
    DegenerateGeometry,
}

/// 必須ランドマークの存在と信頼度を検証するゲート
#[derive(Debug, Clone, Copy)]
pub struct LandmarkGate {
    min_confidence: f32,
}

impl LandmarkGate {
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// `required` の順にキーポイントを返す
    ///
    /// 空フレームは `NoPersonDetected`、欠損または信頼度が閾値未満のものがあれば
    /// 最初の1件を `InsufficientSignal` として返す。
    pub fn validate<const N: usize>(
        &self,
        frame: &PoseFrame,
        required: [LandmarkIndex; N],
    ) -> Result<[Keypoint; N], SignalIssue> {
        if frame.is_empty() {
            return Err(SignalIssue::NoPersonDetected);
        }

        let mut validated = [Keypoint::default(); N];
        for (slot, index) in validated.iter_mut().zip(required) {
            match frame.get(index) {
                Some(kp) if kp.is_valid(self.min_confidence) => *slot = *kp,
                _ => return Err(SignalIssue::InsufficientSignal(index)),
            }
        }
        Ok(validated)
    }
}

impl Default for LandmarkGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LandmarkIndex::*;

    fn frame_with(confidence: f32) -> PoseFrame {
        PoseFrame::new()
            .with(RightHip, Keypoint::new(200.0, 400.0, 0.9))
            .with(RightShoulder, Keypoint::new(200.0, 200.0, 0.9))
            .with(RightWrist, Keypoint::new(200.0, 0.0, confidence))
    }

    #[test]
    fn test_validate_returns_in_order() {
        let gate = LandmarkGate::default();
        let [hip, shoulder, wrist] = gate
            .validate(&frame_with(0.9), [RightHip, RightShoulder, RightWrist])
            .unwrap();
        assert_eq!(hip.y, 400.0);
        assert_eq!(shoulder.y, 200.0);
        assert_eq!(wrist.y, 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let gate = LandmarkGate::default();
        assert!(gate.validate(&frame_with(0.7), [RightWrist]).is_ok());
        assert_eq!(
            gate.validate(&frame_with(0.69), [RightWrist]),
            Err(SignalIssue::InsufficientSignal(RightWrist))
        );
    }

    #[test]
    fn test_missing_landmark() {
        let gate = LandmarkGate::default();
        assert_eq!(
            gate.validate(&frame_with(0.9), [RightHip, LeftKnee]),
            Err(SignalIssue::InsufficientSignal(LeftKnee))
        );
    }

    #[test]
    fn test_empty_frame_is_no_person() {
        let gate = LandmarkGate::new(0.1);
        assert_eq!(
            gate.validate(&PoseFrame::new(), [RightHip]),
            Err(SignalIssue::NoPersonDetected)
        );
    }
}
