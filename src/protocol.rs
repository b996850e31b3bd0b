//! TCP protocol between an upstream pose estimator and the rep server.
//!
//! Messages are bincode-encoded behind a length prefix. The server answers
//! every client message with exactly one server message.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::pose::PoseFrame;
use crate::session::{DisplayPayload, SessionRecord};
use crate::tracker::ExerciseKind;

/// A pose frame is well under 2KB; anything larger is a broken peer.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Pose estimator → rep server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Switch exercise; resets all counters.
    SelectExercise { exercise: ExerciseKind },
    /// One pose estimate. `timestamp_ms` must come from a monotonic clock.
    Frame { timestamp_ms: u64, frame: PoseFrame },
    Reset,
    /// Persist the current totals to session history.
    SaveSession,
}

/// Rep server → pose estimator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Display { payload: DisplayPayload },
    SessionSaved { record: SessionRecord },
    Error { message: String },
}

pub type MessageStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Create a framed message stream with length-delimited framing.
pub fn message_stream(stream: TcpStream) -> MessageStream {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(MAX_MESSAGE_BYTES)
        .new_codec();
    Framed::new(stream, codec)
}

/// Send a serializable message (bincode + length prefix).
pub async fn send_message<T: Serialize>(
    stream: &mut MessageStream,
    msg: &T,
) -> anyhow::Result<()> {
    let data = bincode::serialize(msg)?;
    stream.send(Bytes::from(data)).await?;
    Ok(())
}

/// Receive and deserialize a message. `None` when the peer closed the connection.
pub async fn recv_message<T: DeserializeOwned>(
    stream: &mut MessageStream,
) -> anyhow::Result<Option<T>> {
    match stream.next().await {
        Some(Ok(bytes)) => Ok(Some(bincode::deserialize(&bytes)?)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}
