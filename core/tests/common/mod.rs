use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pkgbatch_core::error::RunnerError;
use pkgbatch_core::runner::{CommandOutput, CommandRunner};

/// Scripted behavior for one package (or the finalize command).
#[derive(Debug, Clone)]
pub enum Script {
    Ok(&'static str),
    Exit { code: i32, stderr: &'static str },
    SpawnErr(&'static str),
}

/// In-memory stand-in for the package manager. Records every argv, tracks the
/// peak number of concurrently in-flight invocations, and resolves each call
/// from a per-package script (default: success).
pub struct FakeCommandRunner {
    scripts: HashMap<String, Script>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            delay: Duration::from_millis(20),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(mut self, key: &str, script: Script) -> Self {
        self.scripts.insert(key.to_string(), script);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput, RunnerError> {
        {
            let mut calls = self.calls.lock().unwrap();
            let mut argv = vec![cmd.to_string()];
            argv.extend(args.iter().cloned());
            calls.push(argv);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        // Key on the package argument when present, else the command itself
        // (finalize invocations have no package).
        let key = args.last().map(String::as_str).unwrap_or(cmd);
        let script = self
            .scripts
            .get(key)
            .or_else(|| self.scripts.get(cmd))
            .cloned()
            .unwrap_or(Script::Ok("ok"));

        match script {
            Script::Ok(stdout) => Ok(CommandOutput {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            }),
            Script::Exit { code, stderr } => Ok(CommandOutput {
                exit_code: code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            Script::SpawnErr(msg) => Err(RunnerError::Spawn(msg.to_string())),
        }
    }
}
