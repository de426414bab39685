use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// One-shot lookup of the latest release
    CheckForUpdate { url: String, current_version: String },
    /// Deliver `SaveDue` for `generation` once `delay` has passed
    ScheduleSave { generation: u64, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    UpdateChecked { available: bool, latest: String },
    UpdateCheckFailed,
    SaveDue { generation: u64 },
}

/// Generation stamp for debounced saves.
///
/// Every mutation bumps the generation; a delivered `SaveDue` writes only if
/// its stamp is still the newest one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveDebouncer {
    generation: u64,
}

impl SaveDebouncer {
    /// Record a mutation and return the stamp to schedule with
    pub fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

pub async fn run_worker(
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
    cancel: CancellationToken,
) {
    loop {
        let task = tokio::select! {
            _ = cancel.cancelled() => break,
            task = task_receiver.recv() => match task {
                Some(task) => task,
                None => break,
            },
        };

        let sender = result_sender.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = perform(task) => {
                    // Receiver gone means the session is over
                    let _ = sender.send(result).await;
                }
            }
        });
    }
    log::debug!("worker: stopped");
}

async fn perform(task: Task) -> TaskResult {
    match task {
        Task::ScheduleSave { generation, delay } => {
            tokio::time::sleep(delay).await;
            TaskResult::SaveDue { generation }
        }
        Task::CheckForUpdate { url, current_version } => {
            match crate::updater::check_for_update(&url, &current_version).await {
                Ok(info) => TaskResult::UpdateChecked {
                    available: info.available,
                    latest: info.latest,
                },
                Err(e) => {
                    log::info!("update: check failed: {}", e);
                    TaskResult::UpdateCheckFailed
                }
            }
        }
    }
}
