//! Line-delimited JSON adapter: one request per input line, one response
//! per output line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{Request, Response};
use crate::worker::WorkerHandle;

/// Pump requests from `reader` into the worker and write responses to
/// `writer` as they complete, which is not necessarily input order.
///
/// Returns once the input is exhausted and every accepted request has been
/// answered.
pub async fn serve<R, W>(handle: WorkerHandle, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Response>();
    let mut out_tx = Some(out_tx);
    let mut lines = reader.lines();
    let mut reading = true;
    info!("Serving JSON lines");

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                match line? {
                    Some(line) => {
                        let Some(tx) = out_tx.as_ref() else {
                            continue;
                        };
                        accept(&handle, line.trim(), tx);
                    }
                    None => {
                        debug!("Input closed");
                        reading = false;
                        out_tx = None;
                    }
                }
            }
            Some(response) = out_rx.recv() => {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                writer.write_all(&encoded).await?;
                writer.flush().await?;
            }
            else => break,
        }
    }

    info!("Input exhausted, all responses written");
    Ok(())
}

fn accept(handle: &WorkerHandle, line: &str, out: &mpsc::UnboundedSender<Response>) {
    if line.is_empty() {
        return;
    }

    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected request line: {e}");
            let _ = out.send(Response::error(format!("invalid request: {e}")));
            return;
        }
    };

    let handle = handle.clone();
    let out = out.clone();
    tokio::spawn(async move {
        let response = handle.send(request).await;
        let _ = out.send(response);
    });
}
