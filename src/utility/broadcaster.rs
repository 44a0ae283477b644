
use serenity::model::id::ChannelId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use chrono::{DateTime, Local};

use std::sync::Arc;
use std::time::Duration;

use crate::utility::*;


pub const DEFAULT_SCHEDULE: &str = "*/5 * * * *";

/// Wall clock the schedule is evaluated against.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

struct BroadcastJob {
    expression: CronExpr,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the single recurring broadcast. Starting again replaces the running
/// job, stopping only prevents future firings.
pub struct Broadcaster {
    platform: Arc<dyn ChatPlatform>,
    clock: Clock,
    job: Option<BroadcastJob>,
}

impl Broadcaster {

    pub fn new(platform: Arc<dyn ChatPlatform>) -> Broadcaster {
        Broadcaster::with_clock(platform, Arc::new(Local::now))
    }

    pub fn with_clock(platform: Arc<dyn ChatPlatform>, clock: Clock) -> Broadcaster {
        Broadcaster { platform, clock, job: None }
    }

    /// A job whose schedule has no upcoming run ends on its own and no longer counts.
    pub fn is_running(&self) -> bool {
        self.job.as_ref().is_some_and(|job| !job.handle.is_finished())
    }

    pub fn expression(&self) -> Option<String> {
        self.job.as_ref().map(|job| job.expression.to_string())
    }

    /// Stops any running job, then schedules one that posts `content` to
    /// `channel` on every firing of `expression`. An invalid expression
    /// leaves nothing running.
    pub fn start(&mut self, expression: &str, channel: ChannelId, content: String) -> Result<(), CronError> {
        self.stop();
        let expression = CronExpr::parse(expression)?;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_job(
            Arc::clone(&self.platform),
            Arc::clone(&self.clock),
            expression.clone(),
            channel,
            content,
            cancel.clone()));

        Logger::info_long("Scheduled broadcast started", &expression.to_string());
        self.job = Some(BroadcastJob { expression, cancel, handle });
        Ok(())
    }

    /// Returns whether a job was running.
    pub fn stop(&mut self) -> bool {
        match self.job.take() {
            Some(job) => {
                let running = !job.handle.is_finished();
                job.cancel.cancel();
                Logger::info_long("Scheduled broadcast stopped", &job.expression.to_string());
                running
            }
            None => false,
        }
    }

}

async fn run_job(platform: Arc<dyn ChatPlatform>,
                 clock: Clock,
                 expression: CronExpr,
                 channel: ChannelId,
                 content: String,
                 cancel: CancellationToken) {
    let mut last_fired = None;
    loop {
        if cancel.is_cancelled() {
            break;
        }

        // never fire the same slot twice if the timer wakes up early
        let now = clock();
        let from = match last_fired {
            Some(last) if last > now => last,
            _ => now,
        };
        let Some(next) = expression.next_after(&from) else {
            Logger::warn_long("Scheduled broadcast has no upcoming run", &expression.to_string());
            break;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {
                last_fired = Some(next);
                if let Err(err) = platform.send(channel, content.clone()).await {
                    Logger::swallowed("Could not deliver scheduled broadcast", err);
                }
            }
        }
    }
}
