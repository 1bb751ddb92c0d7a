//! Tick Driver
//!
//! The graph never ticks on its own. [`Driver`] owns a tokio task that wakes
//! on a fixed interval and ticks the shared [`Session`] whenever it is
//! active. Commands and ticks share one lock, so a command is always applied
//! between two ticks, never in the middle of one.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::command::Session;
use crate::config::EngineConfig;

/// Handle to a running tick loop.
#[derive(Debug)]
pub struct Driver {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl Driver {
    /// Start ticking `session` on the current tokio runtime.
    pub fn spawn(session: Arc<Mutex<Session>>, config: &EngineConfig) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);
        let period = config.tick_interval();

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = 0u64;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tick_once(&session) {
                            ticks += 1;
                        }
                    }
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!(ticks, "tick loop exited");
            ticks
        });

        info!(?period, "tick loop started");
        Self { shutdown, task }
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and wait for it. Returns how many ticks it ran.
    pub async fn stop(self) -> u64 {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(ticks) => ticks,
            Err(error) => {
                tracing::error!(%error, "tick loop task failed");
                0
            }
        }
    }
}

fn tick_once(session: &Mutex<Session>) -> bool {
    let mut session = session.lock();
    if !session.is_active() {
        return false;
    }
    let report = session.graph_mut().tick();
    trace!(?report, "driver tick");
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::command::Command;
    use crate::graph::NodeId;
    use crate::nodes::builtin_registry;
    use crate::reactive::Context;
    use crate::value::ParamData;

    fn fast_config(start_active: bool) -> EngineConfig {
        EngineConfig {
            tick_interval_ms: 1,
            start_active,
            ..EngineConfig::default()
        }
    }

    fn shared_session(config: &EngineConfig) -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Session::new(
            builtin_registry(Context::empty()),
            config,
        )))
    }

    #[tokio::test]
    async fn inactive_sessions_are_left_alone() {
        let config = fast_config(false);
        let session = shared_session(&config);
        let driver = Driver::spawn(session.clone(), &config);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(driver.stop().await, 0);
        assert_eq!(session.lock().graph().tick_count(), 0);
    }

    #[tokio::test]
    async fn active_sessions_propagate_values() {
        let config = fast_config(false);
        let session = shared_session(&config);
        {
            let mut session = session.lock();
            for command in [
                Command::CreateNode {
                    id: NodeId::from("k"),
                    node_type: "constant".to_owned(),
                },
                Command::CreateNode {
                    id: NodeId::from("m"),
                    node_type: "monitor".to_owned(),
                },
                Command::SetNodeParams {
                    id: NodeId::from("k"),
                    params: [("value".to_owned(), ParamData::from(7))].into_iter().collect(),
                },
                Command::CreateLink {
                    output: ("k", "value").into(),
                    input: ("m", "value").into(),
                },
                Command::Activate,
            ] {
                session.apply(command).unwrap();
            }
        }

        let driver = Driver::spawn(session.clone(), &config);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let ticks = driver.stop().await;

        assert!(ticks >= 3, "only {ticks} ticks ran");
        assert_eq!(
            session.lock().graph().node("m").unwrap().state()["value"],
            ParamData::from(7)
        );
    }

    #[tokio::test]
    async fn stop_ends_the_task() {
        let config = fast_config(true);
        let driver = Driver::spawn(shared_session(&config), &config);
        assert!(!driver.is_finished());
        driver.stop().await;
    }
}
