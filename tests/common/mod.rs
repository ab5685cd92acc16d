//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rest_api_template::config::{EnvSource, MapEnv};
use rest_api_template::lifecycle::{Subsystem, SubsystemContext, SubsystemError};

/// Environment that binds the HTTP server to an ephemeral local port.
pub fn local_env() -> MapEnv {
    MapEnv::new()
        .with("SERVER_ADDR", "127.0.0.1")
        .with("SERVER_PORT", "0")
        .with("SERVER_SHUTDOWN_TIMEOUT", "2")
}

/// Environment source that counts lookups.
pub struct RecordingEnv {
    inner: MapEnv,
    reads: AtomicUsize,
}

impl RecordingEnv {
    pub fn new(inner: MapEnv) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl EnvSource for RecordingEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }
}

/// How a mock subsystem misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    FailOnStart,
    FailOnStop,
    HangOnStop,
    FatalAfterStart,
}

/// Records start/stop calls of every mock subsystem it creates.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subsystem(&self, name: &'static str, behavior: Behavior) -> Box<dyn Subsystem> {
        Box::new(MockSubsystem {
            name,
            behavior,
            recorder: self.clone(),
        })
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

struct MockSubsystem {
    name: &'static str,
    behavior: Behavior,
    recorder: Recorder,
}

#[async_trait]
impl Subsystem for MockSubsystem {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn start(&self, ctx: SubsystemContext) -> Result<(), SubsystemError> {
        if self.behavior == Behavior::FailOnStart {
            self.recorder.record(format!("start-failed:{}", self.name));
            return Err(SubsystemError::Failed("refused to start".into()));
        }
        self.recorder.starts.fetch_add(1, Ordering::SeqCst);
        self.recorder.record(format!("start:{}", self.name));

        if self.behavior == Behavior::FatalAfterStart {
            let name = self.name;
            let fatal = ctx.fatal.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                fatal
                    .report(name, SubsystemError::Failed("connection lost".into()))
                    .await;
            });
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), SubsystemError> {
        self.recorder.stops.fetch_add(1, Ordering::SeqCst);
        self.recorder.record(format!("stop:{}", self.name));
        match self.behavior {
            Behavior::HangOnStop => {
                std::future::pending::<()>().await;
                Ok(())
            }
            Behavior::FailOnStop => Err(SubsystemError::Failed("flush failed".into())),
            _ => Ok(()),
        }
    }
}
