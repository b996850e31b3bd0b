use anyhow::Result;
use chrono::Utc;
use std::io::{self, Write};
use rehab_tracker::config::Config;
use rehab_tracker::recording::load_recording;
use rehab_tracker::session::{DisplayPayload, RepSession, SessionHistory};
use rehab_tracker::tracker::ExerciseKind;

const CONFIG_PATH: &str = "config.toml";

fn print_display(display: &DisplayPayload) {
    println!("  {}", display.primary_text);
    if !display.angle_text.is_empty() {
        println!("  {}", display.angle_text);
    }
    if !display.debug_text.is_empty() {
        println!("  {}", display.debug_text);
    }
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);
    let history = SessionHistory::new(&config.session.history_path);
    let mut session = RepSession::new(config.session.default_exercise, config.counter);

    println!("=== Rehab Tracker ({}) ===", env!("GIT_VERSION"));
    println!("種目: {}", session.exercise());
    println!("履歴: {}", history.path().display());
    println!();
    println!("コマンド:");
    for (i, kind) in ExerciseKind::ALL.iter().enumerate() {
        println!("  e {}           - {}", i + 1, kind);
    }
    println!("  f <path>      - 記録ファイルを再生 (JSON Lines)");
    println!("  r             - カウンタをリセット");
    println!("  s             - セッションを履歴に保存");
    println!("  h             - 履歴を表示");
    println!("  q             - 終了");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        let (cmd, arg) = match input.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (input, ""),
        };

        match cmd {
            "" => continue,
            "e" if !arg.is_empty() => match arg.parse::<ExerciseKind>() {
                Ok(kind) => print_display(session.select_exercise(kind)),
                Err(e) => println!("{}", e),
            },
            "f" if !arg.is_empty() => {
                let frames = match load_recording(arg) {
                    Ok(frames) => frames,
                    Err(e) => {
                        println!("読み込み失敗: {:#}", e);
                        continue;
                    }
                };
                let mut last_primary = session.display().primary_text.clone();
                for timed in &frames {
                    let display = session.process(&timed.frame, timed.timestamp_ms);
                    // 表示が変わったときだけ出力
                    if display.primary_text != last_primary {
                        println!("[{:>7}ms] {}", timed.timestamp_ms, display.primary_text);
                        last_primary = display.primary_text.clone();
                    }
                }
                println!("{} フレーム再生しました", frames.len());
                print_display(session.display());
            }
            "r" => print_display(session.reset()),
            "s" => {
                let record = session.record(Utc::now());
                history.append(&record)?;
                println!("保存しました: {}", record.summary_row());
            }
            "h" => {
                let records = history.load()?;
                if records.is_empty() {
                    println!("履歴はありません");
                }
                for record in &records {
                    println!("  {}", record.summary_row());
                }
            }
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", input);
            }
        }
    }

    Ok(())
}
