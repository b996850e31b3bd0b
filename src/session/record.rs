use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::tracker::ExerciseKind;

/// 永続化されるセッション結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub exercise_type: ExerciseKind,
    pub left_reps: u32,
    pub right_reps: u32,
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    /// 履歴一覧の1行
    pub fn summary_row(&self) -> String {
        format!(
            "{:<22} L: {}   R: {}  {}",
            self.exercise_type.name(),
            self.left_reps,
            self.right_reps,
            self.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        )
    }
}

/// JSON Lines ファイルのセッション履歴
pub struct SessionHistory {
    path: PathBuf,
}

impl SessionHistory {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1件追記
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// 新しい順に全件。壊れた行は読み飛ばす
    pub fn load(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut records: Vec<SessionRecord> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}
