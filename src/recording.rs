//! Recorded pose streams (JSON Lines, one `TimedFrame` per line).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::pose::PoseFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    pub timestamp_ms: u64,
    pub frame: PoseFrame,
}

pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Vec<TimedFrame>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_recording(&content).with_context(|| format!("invalid recording {}", path.display()))
}

pub fn parse_recording(content: &str) -> Result<Vec<TimedFrame>> {
    let mut frames: Vec<TimedFrame> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let frame: TimedFrame =
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))?;
        if let Some(prev) = frames.last().map(|f| f.timestamp_ms) {
            if frame.timestamp_ms < prev {
                anyhow::bail!("line {}: timestamp {} goes backwards", i + 1, frame.timestamp_ms);
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkIndex;

    const RECORDING: &str = r#"
{"timestamp_ms":0,"frame":[{"landmark":"LEFT_HIP","x":100.0,"y":200.0,"confidence":0.9}]}

{"timestamp_ms":33,"frame":[]}
"#;

    #[test]
    fn test_parse_recording() {
        let frames = parse_recording(RECORDING).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].frame.get(LandmarkIndex::LeftHip).map(|k| k.x), Some(100.0));
        assert!(frames[1].frame.is_empty());
        assert_eq!(frames[1].timestamp_ms, 33);
    }

    #[test]
    fn test_backwards_timestamp_is_error() {
        let content = "{\"timestamp_ms\":10,\"frame\":[]}\n{\"timestamp_ms\":5,\"frame\":[]}\n";
        let err = parse_recording(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_line_reports_number() {
        let err = parse_recording("{\"timestamp_ms\":0,\"frame\":[]}\nnope\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.jsonl");
        std::fs::write(&path, RECORDING).unwrap();
        assert_eq!(load_recording(&path).unwrap().len(), 2);
        assert!(load_recording(dir.path().join("missing.jsonl")).is_err());
    }
}
