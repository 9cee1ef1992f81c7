use crate::core::AnswerSource;
use crate::utils::error::{QuizError, Result};
use async_trait::async_trait;
use std::io::{self, BufRead, BufReader};
use tokio::sync::mpsc;

/// Answers read one line at a time by a dedicated OS thread.
///
/// The blocking `read_line` never runs on the async runtime, so an
/// abandoned read cannot hold the runtime open; the thread stops at end of
/// input or once this source is dropped and the next line is read.
pub struct LineAnswerSource {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl LineAnswerSource {
    pub fn stdin() -> Result<Self> {
        Self::spawn(BufReader::new(io::stdin()))
    }

    pub fn spawn<R: BufRead + Send + 'static>(mut reader: R) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("answer-reader".to_string())
            .spawn(move || loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        // 非 UTF-8 的行可以略過，其他錯誤則停止讀取
                        let recoverable = e.kind() == io::ErrorKind::InvalidData;
                        if tx.send(Err(e)).is_err() || !recoverable {
                            break;
                        }
                    }
                }
            })?;

        Ok(Self { lines: rx })
    }
}

#[async_trait]
impl AnswerSource for LineAnswerSource {
    async fn read_answer(&mut self) -> Result<Option<String>> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Some(Err(e)) => Err(QuizError::InputError {
                message: e.to_string(),
            }),
            None => Ok(None),
        }
    }
}
