//! Rep server: receives pose frames from an upstream pose estimator over TCP,
//! counts repetitions and answers each message with the display payload.
//!
//! Each connection owns its own session. Messages on a connection are handled
//! one at a time, in order.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::net::{TcpListener, TcpStream};

use rehab_tracker::config::Config;
use rehab_tracker::protocol::{self, ClientMessage, ServerMessage};
use rehab_tracker::session::{RepSession, SessionHistory};

const CONFIG_PATH: &str = "config.toml";

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/rep_server_{}.log", ts);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path))?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "[{}] {}", chrono::Local::now().format("%H:%M:%S%.3f"), msg);
            let _ = f.flush();
        }
    }};
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

async fn serve_client(
    socket: TcpStream,
    addr: SocketAddr,
    config: &Config,
    logfile: &LogFile,
) -> Result<()> {
    let mut stream = protocol::message_stream(socket);
    let history = SessionHistory::new(&config.session.history_path);
    let mut session = RepSession::new(config.session.default_exercise, config.counter);
    let mut frame_count: u64 = 0;

    log!(logfile, "[{}] exercise: {}", addr, session.exercise());

    while let Some(msg) = protocol::recv_message::<ClientMessage>(&mut stream).await? {
        let reply = match msg {
            ClientMessage::SelectExercise { exercise } => {
                log!(logfile, "[{}] exercise: {}", addr, exercise);
                ServerMessage::Display { payload: session.select_exercise(exercise).clone() }
            }
            ClientMessage::Frame { timestamp_ms, frame } => {
                frame_count += 1;
                let payload = session.process(&frame, timestamp_ms).clone();
                if config.server.verbose {
                    log!(
                        logfile,
                        "[{}] t={} landmarks={} conf={:.2} | {} | {} | {}",
                        addr,
                        timestamp_ms,
                        frame.len(),
                        frame.average_confidence(),
                        payload.primary_text,
                        payload.angle_text,
                        payload.debug_text
                    );
                }
                ServerMessage::Display { payload }
            }
            ClientMessage::Reset => {
                log!(logfile, "[{}] reset", addr);
                ServerMessage::Display { payload: session.reset().clone() }
            }
            ClientMessage::SaveSession => {
                let record = session.record(Utc::now());
                match history.append(&record) {
                    Ok(()) => {
                        log!(
                            logfile,
                            "[{}] saved {} L={} R={} to {}",
                            addr,
                            record.exercise_type,
                            record.left_reps,
                            record.right_reps,
                            history.path().display()
                        );
                        ServerMessage::SessionSaved { record }
                    }
                    Err(e) => {
                        log!(logfile, "[{}] save failed: {:#}", addr, e);
                        ServerMessage::Error { message: format!("{:#}", e) }
                    }
                }
            }
        };
        protocol::send_message(&mut stream, &reply).await?;
    }

    log!(
        logfile,
        "[{}] disconnected after {} frames ({})",
        addr,
        frame_count,
        session.display().primary_text
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(Config::load_or_default(CONFIG_PATH));
    let logfile = open_log_file()?;

    log!(logfile, "Rep Server ({})", env!("GIT_VERSION"));
    log!(logfile, "Listen: {}", config.server.listen_addr);
    log!(
        logfile,
        "Counter: min_confidence={} cooldown={}ms",
        config.counter.min_confidence,
        config.counter.cooldown_ms
    );
    log!(logfile, "Default exercise: {}", config.session.default_exercise);
    log!(logfile, "History: {}", config.session.history_path);
    if config.server.verbose { log!(logfile, "Verbose mode: ON"); }

    let bind_addr: SocketAddr = config.server.listen_addr.parse()
        .context("invalid listen_addr")?;
    let listener = TcpListener::bind(bind_addr).await?;
    log!(logfile, "Listening on {}", bind_addr);

    loop {
        let (socket, addr) = listener.accept().await?;
        socket.set_nodelay(true)?;
        log!(logfile, "Client connected: {}", addr);

        let config = Arc::clone(&config);
        let logfile = Arc::clone(&logfile);
        tokio::spawn(async move {
            if let Err(e) = serve_client(socket, addr, &config, &logfile).await {
                log!(logfile, "[{}] connection error: {:#}", addr, e);
            }
        });
    }
}
