use crate::core::cancel::{CancelListener, CancelSignal};
use crate::core::{AnswerSource, Problem, SessionReport};
use crate::utils::error::Result;
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// What an answer task hands back through its single-slot channel.
#[derive(Debug)]
enum Delivery {
    Answer(String),
    ReadFailed(String),
}

enum Outcome {
    Answered(String),
    Unanswerable,
    TimedOut,
}

/// Runs one quiz session against an answer source, writing prompts to `out`.
pub struct QuizRunner<S: AnswerSource, W: Write> {
    source: Arc<Mutex<S>>,
    out: W,
}

impl<S: AnswerSource, W: Write> QuizRunner<S, W> {
    pub fn new(source: S, out: W) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            out,
        }
    }

    pub async fn run(&mut self, problems: &[Problem], limit: Duration) -> Result<SessionReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        // sleep() saturates to a far-future instant for huge limits
        let timer = tokio::time::sleep(limit);
        let deadline = timer.deadline();
        tokio::pin!(timer);

        let cancel = CancelSignal::new();
        let mut pending: Option<JoinHandle<()>> = None;
        let mut correct = 0;
        let mut answered = 0;
        let mut timed_out = false;

        tracing::debug!("Session started: {} problems, limit {:?}", problems.len(), limit);

        for (index, problem) in problems.iter().enumerate() {
            write!(self.out, "Problem #{}: {} = ", index + 1, problem.question())?;
            self.out.flush()?;

            let (handle, mut delivery) = spawn_answer_task(Arc::clone(&self.source), cancel.subscribe());
            pending = Some(handle);

            let mut outcome = tokio::select! {
                biased;
                _ = &mut timer => Outcome::TimedOut,
                received = &mut delivery => match received {
                    Ok(Delivery::Answer(answer)) => Outcome::Answered(answer),
                    Ok(Delivery::ReadFailed(message)) => {
                        tracing::warn!("Failed to read answer for problem #{}: {}", index + 1, message);
                        writeln!(self.out, "Failed to read answer!")?;
                        Outcome::Unanswerable
                    }
                    Err(_) => {
                        tracing::debug!("Answer stream exhausted at problem #{}", index + 1);
                        Outcome::Unanswerable
                    }
                },
            };

            // 無法作答的題目只能等待截止時間
            if let Outcome::Unanswerable = outcome {
                (&mut timer).await;
                outcome = Outcome::TimedOut;
            }

            match outcome {
                Outcome::Answered(answer) if Instant::now() < deadline => {
                    answered += 1;
                    if problem.is_correct(&answer) {
                        correct += 1;
                    }
                    tracing::debug!(
                        "Problem #{} answered ({}/{} correct so far)",
                        index + 1,
                        correct,
                        answered
                    );
                }
                _ => {
                    timed_out = true;
                    writeln!(self.out)?;
                    tracing::info!("⏰ Time limit reached at problem #{}", index + 1);
                    break;
                }
            }
        }

        cancel.cancel();
        if let Some(handle) = pending.take() {
            if handle.await.is_err() {
                tracing::warn!("Answer task ended abnormally");
            }
        }

        let report = SessionReport {
            correct,
            total: problems.len(),
            answered,
            timed_out,
            elapsed: start.elapsed(),
            started_at,
        };

        writeln!(self.out, "{}", report.summary_line())?;
        self.out.flush()?;

        tracing::info!(
            "✅ Session finished: {}/{} correct, {} answered, timed out: {}",
            report.correct,
            report.total,
            report.answered,
            report.timed_out
        );

        Ok(report)
    }
}

/// Runs a single session and returns its report.
pub async fn run_session<S: AnswerSource, W: Write>(
    problems: &[Problem],
    limit: Duration,
    source: S,
    out: W,
) -> Result<SessionReport> {
    QuizRunner::new(source, out).run(problems, limit).await
}

fn spawn_answer_task<S: AnswerSource>(
    source: Arc<Mutex<S>>,
    mut cancel: CancelListener,
) -> (JoinHandle<()>, oneshot::Receiver<Delivery>) {
    let (tx, rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let mut source = tokio::select! {
            guard = source.lock_owned() => guard,
            _ = cancel.cancelled() => return,
        };

        tokio::select! {
            read = source.read_answer() => match read {
                Ok(Some(line)) => {
                    let _ = tx.send(Delivery::Answer(line));
                }
                // 輸入結束：不送出任何答案
                Ok(None) => {}
                Err(e) => {
                    let _ = tx.send(Delivery::ReadFailed(e.to_string()));
                }
            },
            _ = cancel.cancelled() => {}
        }
    });

    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::QuizError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays answers, each after its own delay measured from the read request.
    struct ScriptedAnswers {
        script: VecDeque<(Duration, Option<&'static str>)>,
        reads: Arc<AtomicUsize>,
    }

    impl ScriptedAnswers {
        fn new(script: Vec<(u64, Option<&'static str>)>) -> Self {
            Self {
                script: script
                    .into_iter()
                    .map(|(millis, answer)| (Duration::from_millis(millis), answer))
                    .collect(),
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl AnswerSource for ScriptedAnswers {
        async fn read_answer(&mut self) -> Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.script.pop_front() {
                Some((delay, answer)) => {
                    tokio::time::sleep(delay).await;
                    Ok(answer.map(str::to_string))
                }
                None => Ok(None),
            }
        }
    }

    struct FailingSource;

    #[async_trait]
    impl AnswerSource for FailingSource {
        async fn read_answer(&mut self) -> Result<Option<String>> {
            Err(QuizError::InputError {
                message: "unexpected newline".to_string(),
            })
        }
    }

    fn arithmetic() -> Vec<Problem> {
        vec![Problem::new("2+2", "4"), Problem::new("3+3", "6")]
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_answers_in_time() {
        let source = ScriptedAnswers::new(vec![(100, Some("4")), (100, Some("6"))]);
        let mut out = Vec::new();

        let report = run_session(&arithmetic(), Duration::from_secs(10), source, &mut out)
            .await
            .unwrap();

        assert_eq!(report.score(), (2, 2));
        assert_eq!(report.answered, 2);
        assert!(!report.timed_out);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Problem #1: 2+2 = "));
        assert!(text.contains("Problem #2: 3+3 = "));
        assert!(text.ends_with("You scored 2 out of 2.\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_shows_first_question_only() {
        let source = ScriptedAnswers::new(vec![(0, Some("4")), (0, Some("6"))]);
        let mut out = Vec::new();

        let report = run_session(&arithmetic(), Duration::ZERO, source, &mut out)
            .await
            .unwrap();

        assert_eq!(report.score(), (0, 2));
        assert_eq!(report.answered, 0);
        assert!(report.timed_out);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Problem #1: 2+2 = "));
        assert!(!text.contains("Problem #2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_first_answer_stops_session() {
        let source = ScriptedAnswers::new(vec![(5_000, Some("4")), (0, Some("6"))]);
        let reads = Arc::clone(&source.reads);
        let mut out = Vec::new();

        let report = run_session(&arithmetic(), Duration::from_secs(1), source, &mut out)
            .await
            .unwrap();

        assert_eq!(report.score(), (0, 2));
        assert!(report.timed_out);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(!String::from_utf8(out).unwrap().contains("Problem #2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_shared_across_questions() {
        // Each answer alone fits in the limit, together they do not.
        let source = ScriptedAnswers::new(vec![
            (600, Some("4")),
            (600, Some("6")),
        ]);
        let mut out = Vec::new();

        let report = run_session(&arithmetic(), Duration::from_secs(1), source, &mut out)
            .await
            .unwrap();

        assert_eq!(report.score(), (1, 2));
        assert_eq!(report.answered, 1);
        assert!(report.timed_out);
        assert!(report.elapsed <= Duration::from_millis(1_001));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_whitespace_counts_as_correct() {
        let source = ScriptedAnswers::new(vec![(10, Some("4 ")), (10, Some("7"))]);
        let report = run_session(&arithmetic(), Duration::from_secs(5), source, Vec::new())
            .await
            .unwrap();

        assert_eq!(report.score(), (1, 2));
        assert_eq!(report.answered, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_input_waits_for_deadline() {
        let source = ScriptedAnswers::new(vec![(10, Some("4")), (10, None)]);
        let limit = Duration::from_secs(3);

        let report = run_session(&arithmetic(), limit, source, Vec::new())
            .await
            .unwrap();

        assert_eq!(report.score(), (1, 2));
        assert!(report.timed_out);
        assert!(report.elapsed >= limit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_is_reported_but_not_scored() {
        let mut out = Vec::new();
        let report = run_session(&arithmetic(), Duration::from_secs(2), FailingSource, &mut out)
            .await
            .unwrap();

        assert_eq!(report.score(), (0, 2));
        assert!(report.timed_out);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to read answer!"));
        assert!(!text.contains("Problem #2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_runs_are_identical() {
        let mut scores = Vec::new();
        for _ in 0..3 {
            let source = ScriptedAnswers::new(vec![(300, Some("4")), (900, Some("6"))]);
            let report = run_session(&arithmetic(), Duration::from_secs(1), source, Vec::new())
                .await
                .unwrap();
            scores.push(report.score());
        }
        assert_eq!(scores, vec![(1, 2); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_task_releases_source() {
        let source = ScriptedAnswers::new(vec![(60_000, Some("4"))]);
        let mut runner = QuizRunner::new(source, Vec::new());

        let report = runner
            .run(&arithmetic(), Duration::from_millis(500))
            .await
            .unwrap();
        assert!(report.timed_out);

        // The cancelled task dropped its lock, so the source is free again.
        assert!(runner.source.try_lock().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_limit_scores_normally() {
        let source = ScriptedAnswers::new(vec![(10, Some("4"))]);
        let problems = vec![Problem::new("2+2", "4")];

        let report = run_session(&problems, Duration::MAX, source, Vec::new())
            .await
            .unwrap();

        assert_eq!(report.score(), (1, 1));
        assert!(!report.timed_out);
    }

    #[tokio::test]
    async fn test_empty_problem_list() {
        let source = ScriptedAnswers::new(vec![]);
        let report = run_session(&[], Duration::from_secs(1), source, Vec::new())
            .await
            .unwrap();
        assert_eq!(report.score(), (0, 0));
        assert!(!report.timed_out);
    }
}
