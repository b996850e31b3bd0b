use serde::{Deserialize, Serialize};

use crate::pose::SignalIssue;
use crate::tracker::{ExerciseKind, LimbState};

/// 表示層へ渡す1フレーム分のテキスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    /// レップ数またはガイド文
    pub primary_text: String,
    /// 現在の関節角度。信号不足時は空
    pub angle_text: String,
    /// 左右の位相
    pub debug_text: String,
}

impl DisplayPayload {
    /// リセット直後の表示
    pub fn initial(kind: ExerciseKind) -> Self {
        let primary_text = match kind {
            ExerciseKind::ArmRaises => arm_reps(0),
            _ => bilateral_reps(kind, 0, 0),
        };
        Self {
            primary_text,
            angle_text: String::new(),
            debug_text: format!("Mode: {}", kind),
        }
    }

    /// ランドマーク不足・人物未検出時の表示
    pub fn for_issue(kind: ExerciseKind, issue: SignalIssue) -> Self {
        match issue {
            SignalIssue::NoPersonDetected => Self {
                primary_text: "No person detected".to_string(),
                ..Self::default()
            },
            SignalIssue::InsufficientSignal(_) | SignalIssue::DegenerateGeometry => Self {
                primary_text: kind.insufficient_prompt().to_string(),
                angle_text: String::new(),
                debug_text: "Low confidence".to_string(),
            },
        }
    }

    pub fn for_arm(count: u32, angle: f32, raised: bool) -> Self {
        Self {
            primary_text: arm_reps(count),
            angle_text: format!("Shoulder angle: {}°", angle as i32),
            debug_text: (if raised { "Phase: UP" } else { "Phase: DOWN" }).to_string(),
        }
    }

    pub fn for_sides(
        kind: ExerciseKind,
        left: (&LimbState, f32),
        right: (&LimbState, f32),
    ) -> Self {
        let joint = kind.joint_label();
        let phase = |limb: &LimbState| if limb.is_armed() { kind.armed_label() } else { "READY" };
        Self {
            primary_text: bilateral_reps(kind, left.0.count(), right.0.count()),
            angle_text: format!(
                "L {}: {}°   R {}: {}°",
                joint, left.1 as i32, joint, right.1 as i32
            ),
            debug_text: format!("L {} | R {}", phase(left.0), phase(right.0)),
        }
    }
}

fn arm_reps(count: u32) -> String {
    format!("Arm Reps: {}", count)
}

fn bilateral_reps(kind: ExerciseKind, left: u32, right: u32) -> String {
    format!("{} - L: {} | R: {}", kind, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkIndex;

    #[test]
    fn test_initial_payloads() {
        let arm = DisplayPayload::initial(ExerciseKind::ArmRaises);
        assert_eq!(arm.primary_text, "Arm Reps: 0");
        assert_eq!(arm.angle_text, "");
        assert_eq!(arm.debug_text, "Mode: Arm Raises");

        let heel = DisplayPayload::initial(ExerciseKind::HeelSlides);
        assert_eq!(heel.primary_text, "Heel Slides - L: 0 | R: 0");
        assert_eq!(heel.debug_text, "Mode: Heel Slides");
    }

    #[test]
    fn test_issue_payloads() {
        let none = DisplayPayload::for_issue(ExerciseKind::LegLifts, SignalIssue::NoPersonDetected);
        assert_eq!(none.primary_text, "No person detected");
        assert!(none.angle_text.is_empty() && none.debug_text.is_empty());

        let low = DisplayPayload::for_issue(
            ExerciseKind::ArmRaises,
            SignalIssue::InsufficientSignal(LandmarkIndex::RightWrist),
        );
        assert_eq!(low.primary_text, "Raise your whole arm");
        assert_eq!(low.debug_text, "Low confidence");
        assert!(low.angle_text.is_empty());
    }

    #[test]
    fn test_angles_are_truncated() {
        let limb = LimbState::default();
        let payload = DisplayPayload::for_sides(ExerciseKind::HeelSlides, (&limb, 119.9), (&limb, 171.2));
        assert_eq!(payload.angle_text, "L knee: 119°   R knee: 171°");
        assert_eq!(payload.debug_text, "L READY | R READY");

        let arm = DisplayPayload::for_arm(3, 165.7, true);
        assert_eq!(arm.primary_text, "Arm Reps: 3");
        assert_eq!(arm.angle_text, "Shoulder angle: 165°");
        assert_eq!(arm.debug_text, "Phase: UP");
    }
}
