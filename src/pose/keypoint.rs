use serde::{Deserialize, Serialize};

/// ポーズ推定モデルの 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    LeftMouth = 9,
    RightMouth = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    /// インデックス順の全ランドマーク
    pub const ALL: [LandmarkIndex; Self::COUNT] = {
        use LandmarkIndex::*;
        [
            Nose, LeftEyeInner, LeftEye, LeftEyeOuter, RightEyeInner, RightEye, RightEyeOuter,
            LeftEar, RightEar, LeftMouth, RightMouth,
            LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
            LeftPinky, RightPinky, LeftIndex, RightIndex, LeftThumb, RightThumb,
            LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
            LeftHeel, RightHeel, LeftFootIndex, RightFootIndex,
        ]
    };

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 単一ランドマークの検出結果
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    /// X座標（フレームのピクセル座標）
    pub x: f32,
    /// Y座標（ピクセル座標、下向きが正）
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// 同一座標か（角度計算が定義できない）
    pub fn coincides_with(&self, other: &Keypoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// ワイヤ・記録ファイル上のランドマーク1件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub landmark: LandmarkIndex,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// 1フレーム分のランドマーク集合
///
/// 検出されなかったランドマークは `None`。全て `None` なら人物未検出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Detection>", into = "Vec<Detection>")]
pub struct PoseFrame {
    landmarks: [Option<Keypoint>; LandmarkIndex::COUNT],
}

impl PoseFrame {
    pub fn new() -> Self {
        Self {
            landmarks: [None; LandmarkIndex::COUNT],
        }
    }

    /// ランドマークを追加したフレームを返す
    pub fn with(mut self, index: LandmarkIndex, keypoint: Keypoint) -> Self {
        self.insert(index, keypoint);
        self
    }

    pub fn insert(&mut self, index: LandmarkIndex, keypoint: Keypoint) {
        self.landmarks[index as usize] = Some(keypoint);
    }

    pub fn remove(&mut self, index: LandmarkIndex) -> Option<Keypoint> {
        self.landmarks[index as usize].take()
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> Option<&Keypoint> {
        self.landmarks[index as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.landmarks.iter().filter(|k| k.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.iter().all(|k| k.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkIndex, &Keypoint)> + '_ {
        LandmarkIndex::ALL
            .iter()
            .zip(self.landmarks.iter())
            .filter_map(|(&index, kp)| kp.as_ref().map(|kp| (index, kp)))
    }

    /// 検出済みランドマークの平均信頼度
    pub fn average_confidence(&self) -> f32 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f32 = self.iter().map(|(_, k)| k.confidence).sum();
        sum / count as f32
    }
}

impl Default for PoseFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Detection>> for PoseFrame {
    fn from(detections: Vec<Detection>) -> Self {
        detections.into_iter().fold(PoseFrame::new(), |frame, d| {
            frame.with(d.landmark, Keypoint::new(d.x, d.y, d.confidence))
        })
    }
}

impl From<PoseFrame> for Vec<Detection> {
    fn from(frame: PoseFrame) -> Self {
        frame
            .iter()
            .map(|(landmark, kp)| Detection {
                landmark,
                x: kp.x,
                y: kp.y,
                confidence: kp.confidence,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_from_index() {
        assert_eq!(LandmarkIndex::from_index(0), Some(LandmarkIndex::Nose));
        assert_eq!(LandmarkIndex::from_index(23), Some(LandmarkIndex::LeftHip));
        assert_eq!(LandmarkIndex::from_index(32), Some(LandmarkIndex::RightFootIndex));
        assert_eq!(LandmarkIndex::from_index(33), None);
    }

    #[test]
    fn test_all_matches_discriminants() {
        for (i, index) in LandmarkIndex::ALL.iter().enumerate() {
            assert_eq!(*index as usize, i);
        }
    }

    #[test]
    fn test_keypoint_is_valid() {
        let kp = Keypoint::new(100.0, 200.0, 0.7);
        assert!(kp.is_valid(0.7));
        assert!(!Keypoint::new(100.0, 200.0, 0.69).is_valid(0.7));
    }

    #[test]
    fn test_empty_frame() {
        let frame = PoseFrame::new();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
        assert_eq!(frame.average_confidence(), 0.0);
        assert!(frame.get(LandmarkIndex::LeftHip).is_none());
    }

    #[test]
    fn test_frame_insert_and_remove() {
        let mut frame = PoseFrame::new().with(LandmarkIndex::LeftHip, Keypoint::new(1.0, 2.0, 0.9));
        assert!(!frame.is_empty());
        assert_eq!(frame.get(LandmarkIndex::LeftHip).map(|k| k.y), Some(2.0));

        frame.insert(LandmarkIndex::RightHip, Keypoint::new(3.0, 4.0, 0.5));
        assert_eq!(frame.len(), 2);
        assert!((frame.average_confidence() - 0.7).abs() < 1e-6);

        assert!(frame.remove(LandmarkIndex::LeftHip).is_some());
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_frame_json_uses_landmark_names() {
        let frame = PoseFrame::new().with(LandmarkIndex::RightWrist, Keypoint::new(10.0, 20.0, 0.8));
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"RIGHT_WRIST\""));

        let parsed: PoseFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }
}
