// ABOUTME: Operator session loop: reads commands line by line and answers with the master's result
// ABOUTME: Each result is written as `= <result>` plus a blank line and flushed immediately

use crate::farm::Farm;
use crate::member::Exchange;
use gofarm_gtp::QUIT_COMMAND;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Drive the farm from a line-oriented operator stream.
///
/// One command per line; `quit` tears the farm down and ends the
/// session, as does end of input. Any member error aborts the session
/// without writing a result line for the failed command.
pub async fn run_session<E, R, W>(
    farm: &mut Farm<E>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    E: Exchange,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == QUIT_COMMAND {
            farm.quit().await;
            break;
        }

        let result = farm.dispatch(line).await?;
        output
            .write_all(format!("= {result}\n\n").as_bytes())
            .await?;
        output.flush().await?;
    }

    // End of input without an explicit quit still tears the farm down.
    if farm.is_active() {
        farm.quit().await;
    }
    Ok(())
}
