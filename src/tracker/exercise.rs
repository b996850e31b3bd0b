use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cycle::LimbSide;
use crate::pose::LandmarkIndex;

/// リハビリ種目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExerciseKind {
    #[serde(rename = "Arm Raises")]
    ArmRaises,
    #[default]
    #[serde(rename = "Leg Lifts")]
    LegLifts,
    #[serde(rename = "Heel Slides")]
    HeelSlides,
    #[serde(rename = "Standing Hip Flexion")]
    StandingHipFlexion,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 4] = [
        ExerciseKind::ArmRaises,
        ExerciseKind::LegLifts,
        ExerciseKind::HeelSlides,
        ExerciseKind::StandingHipFlexion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExerciseKind::ArmRaises => "Arm Raises",
            ExerciseKind::LegLifts => "Leg Lifts",
            ExerciseKind::HeelSlides => "Heel Slides",
            ExerciseKind::StandingHipFlexion => "Standing Hip Flexion",
        }
    }

    /// カウント対象の側。腕上げは右腕のみ
    pub fn tracked_sides(self) -> &'static [LimbSide] {
        match self {
            ExerciseKind::ArmRaises => &[LimbSide::Right],
            _ => &LimbSide::BOTH,
        }
    }

    /// 角度計算に使う3点 (a, 頂点b, c)
    pub fn joint_chain(self, side: LimbSide) -> [LandmarkIndex; 3] {
        match self {
            ExerciseKind::ArmRaises => [
                LandmarkIndex::RightHip,
                LandmarkIndex::RightShoulder,
                LandmarkIndex::RightWrist,
            ],
            ExerciseKind::LegLifts | ExerciseKind::StandingHipFlexion => {
                [side.shoulder(), side.hip(), side.knee()]
            }
            ExerciseKind::HeelSlides => [side.hip(), side.knee(), side.ankle()],
        }
    }

    /// フレームごとに必要な全ランドマーク
    pub fn required_landmarks(self) -> Vec<LandmarkIndex> {
        self.tracked_sides()
            .iter()
            .flat_map(|&side| self.joint_chain(side))
            .collect()
    }

    /// 角度表示に使う関節名
    pub fn joint_label(self) -> &'static str {
        match self {
            ExerciseKind::ArmRaises => "Shoulder",
            ExerciseKind::LegLifts | ExerciseKind::StandingHipFlexion => "hip",
            ExerciseKind::HeelSlides => "knee",
        }
    }

    /// Armed 中の位相表示
    pub fn armed_label(self) -> &'static str {
        match self {
            ExerciseKind::ArmRaises => "DOWN",
            ExerciseKind::LegLifts => "DOWN->UP",
            ExerciseKind::HeelSlides => "FLEXED->EXTEND",
            ExerciseKind::StandingHipFlexion => "FLEX->EXTEND",
        }
    }

    /// ランドマーク不足時のガイド文
    pub fn insufficient_prompt(self) -> &'static str {
        match self {
            ExerciseKind::ArmRaises => "Raise your whole arm",
            ExerciseKind::LegLifts => "Stand in front of camera",
            ExerciseKind::HeelSlides => "Heel Slides - get fully in frame",
            ExerciseKind::StandingHipFlexion => "Standing Hip Flexion - stand facing camera",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseKind {
    type Err = anyhow::Error;

    /// 表示名（大文字小文字・区切り文字は無視）または 1〜4 の番号
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| anyhow::anyhow!("exercise number must be 1-{}: {}", Self::ALL.len(), n));
        }

        let normalize = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.name()) == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown exercise: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("Leg Lifts".parse::<ExerciseKind>().unwrap(), ExerciseKind::LegLifts);
        assert_eq!("heel_slides".parse::<ExerciseKind>().unwrap(), ExerciseKind::HeelSlides);
        assert_eq!(
            "standing-hip-flexion".parse::<ExerciseKind>().unwrap(),
            ExerciseKind::StandingHipFlexion
        );
        assert_eq!("1".parse::<ExerciseKind>().unwrap(), ExerciseKind::ArmRaises);
        assert!("0".parse::<ExerciseKind>().is_err());
        assert!("5".parse::<ExerciseKind>().is_err());
        assert!("squats".parse::<ExerciseKind>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&ExerciseKind::StandingHipFlexion).unwrap();
        assert_eq!(json, "\"Standing Hip Flexion\"");
        let parsed: ExerciseKind = serde_json::from_str("\"Arm Raises\"").unwrap();
        assert_eq!(parsed, ExerciseKind::ArmRaises);
    }

    #[test]
    fn test_required_landmarks() {
        use LandmarkIndex::*;
        assert_eq!(
            ExerciseKind::ArmRaises.required_landmarks(),
            vec![RightHip, RightShoulder, RightWrist]
        );
        assert_eq!(
            ExerciseKind::HeelSlides.required_landmarks(),
            vec![LeftHip, LeftKnee, LeftAnkle, RightHip, RightKnee, RightAnkle]
        );
        assert_eq!(
            ExerciseKind::LegLifts.required_landmarks(),
            ExerciseKind::StandingHipFlexion.required_landmarks()
        );
    }
}
