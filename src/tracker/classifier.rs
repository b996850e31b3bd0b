//! Per-exercise trigger/release classification.
//!
//! Thresholds are fixed clinical constants. Each side gets one angle and two
//! predicates per frame; the cycle state machine in [`super::cycle`] consumes them.

use super::cycle::LimbSide;
use super::exercise::ExerciseKind;
use crate::pose::{angle_at, Keypoint, LandmarkGate, PoseFrame, SignalIssue};

/// 屈曲とみなす角度（度）
pub const FLEXED_ANGLE: f32 = 120.0;
/// 股関節伸展とみなす角度（脚上げ・立位股関節屈曲）
pub const HIP_EXTENDED_ANGLE: f32 = 165.0;
/// 膝伸展とみなす角度（ヒールスライド）
pub const KNEE_EXTENDED_ANGLE: f32 = 170.0;
/// 腕上げ: 腰-肩-手首の最小角度
pub const ARM_RAISED_ANGLE: f32 = 160.0;
/// 腕上げ: 手首が肩より上にあるべき距離（px）
pub const WRIST_ABOVE_SHOULDER_PX: f32 = 50.0;
/// 立位股関節屈曲: 膝が腰より上にあるべき距離（px）
pub const KNEE_ABOVE_HIP_PX: f32 = 30.0;

/// 片側1フレーム分の判定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideReading {
    pub angle: f32,
    pub trigger: bool,
    pub release: bool,
}

/// フレームの判定結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readings {
    /// 腕上げ（右腕のみ）
    Single(SideReading),
    Bilateral { left: SideReading, right: SideReading },
}

/// フレームを種目ごとに判定する
///
/// 必要なランドマークは左右まとめて先に検証し、1つでも欠けたら角度は計算しない。
pub fn classify(
    kind: ExerciseKind,
    frame: &PoseFrame,
    gate: &LandmarkGate,
) -> Result<Readings, SignalIssue> {
    match kind {
        ExerciseKind::ArmRaises => {
            let [hip, shoulder, wrist] = gate.validate(frame, kind.joint_chain(LimbSide::Right))?;
            Ok(Readings::Single(read_side(kind, &hip, &shoulder, &wrist)?))
        }
        ExerciseKind::LegLifts | ExerciseKind::HeelSlides | ExerciseKind::StandingHipFlexion => {
            let [la, lb, lc] = kind.joint_chain(LimbSide::Left);
            let [ra, rb, rc] = kind.joint_chain(LimbSide::Right);
            let [la, lb, lc, ra, rb, rc] = gate.validate(frame, [la, lb, lc, ra, rb, rc])?;
            Ok(Readings::Bilateral {
                left: read_side(kind, &la, &lb, &lc)?,
                right: read_side(kind, &ra, &rb, &rc)?,
            })
        }
    }
}

fn read_side(
    kind: ExerciseKind,
    a: &Keypoint,
    b: &Keypoint,
    c: &Keypoint,
) -> Result<SideReading, SignalIssue> {
    let angle = angle_at(a, b, c).ok_or(SignalIssue::DegenerateGeometry)?;

    let (trigger, release) = match kind {
        ExerciseKind::ArmRaises => {
            // a: hip, b: shoulder, c: wrist
            let raised = c.y < b.y - WRIST_ABOVE_SHOULDER_PX && angle > ARM_RAISED_ANGLE;
            (!raised, raised)
        }
        ExerciseKind::LegLifts => (angle < FLEXED_ANGLE, angle > HIP_EXTENDED_ANGLE),
        ExerciseKind::HeelSlides => (angle < FLEXED_ANGLE, angle > KNEE_EXTENDED_ANGLE),
        ExerciseKind::StandingHipFlexion => {
            // a: shoulder, b: hip, c: knee
            let knee_lifted = c.y < b.y - KNEE_ABOVE_HIP_PX;
            (angle < FLEXED_ANGLE && knee_lifted, angle > HIP_EXTENDED_ANGLE)
        }
    };

    Ok(SideReading { angle, trigger, release })
}
