//! Newline-delimited JSON encoding of a progress stream.
//!
//! Every message is one compact JSON object followed by exactly one `\n`.
//! Messages are tagged with a `type` field and carry their payload in `data`:
//!
//! ```text
//! {"type":"progress","data":{"current":3,"total":20,"percentage":15.0,"description":"Layout detection","status":"running"}}
//! {"type":"result","data":{...}}
//! {"type":"error","data":{"message":"page 4 could not be analyzed"}}
//! ```

use crate::Result;
use crate::monitor::ProgressSnapshot;
use crate::runner::{ProgressRecord, RunError};
use ohno::IntoAppError;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamMessage<'a, T> {
    Progress(&'a ProgressSnapshot),
    Result(&'a T),
    Error { message: String },
}

/// Serialize one message as a single newline-terminated line.
pub fn encode_line<T: Serialize>(message: &StreamMessage<'_, T>) -> Result<String> {
    let mut line = serde_json::to_string(message).into_app_err("serializing stream message")?;
    line.push('\n');
    Ok(line)
}

/// Encode every item of a progress stream, handing each line to `emit`.
///
/// Every record becomes a progress message, including the terminal `completed`
/// one, which is followed by a result message. A failed run produces an error
/// message and then returns the failure.
pub fn encode_records<T, I, F>(records: I, mut emit: F) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = core::result::Result<ProgressRecord<T>, RunError>>,
    F: FnMut(String) -> Result<()>,
{
    for item in records {
        match item {
            Ok(record) => {
                emit(encode_line(&StreamMessage::<T>::Progress(&record.snapshot))?)?;
                if let Some(result) = &record.result {
                    emit(encode_line(&StreamMessage::Result(result))?)?;
                }
            }
            Err(e) => {
                let message: StreamMessage<'_, T> = StreamMessage::Error { message: e.to_string() };
                emit(encode_line(&message)?)?;
                return Err(e).into_app_err("job failed");
            }
        }
    }

    Ok(())
}
