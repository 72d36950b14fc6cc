use crate::domain::ports::ActivityLog;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

/// Keeps the most recent activity lines in memory, oldest first.
pub struct MemoryActivityLog {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl MemoryActivityLog {
    pub const DEFAULT_CAPACITY: usize = 300;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // A poisoned log still holds valid lines.
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryActivityLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ActivityLog for MemoryActivityLog {
    fn record(&self, line: String) {
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }
}

/// Writes each activity line to a writer as it arrives.
pub struct ConsoleActivityLog<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleActivityLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl ConsoleActivityLog<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ActivityLog for ConsoleActivityLog<W> {
    fn record(&self, line: String) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // The activity sink is best effort; a closed stdout must not abort an action.
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Forwards every line to several sinks, in order.
pub struct TeeActivityLog {
    sinks: Vec<crate::domain::ports::ActivityLogHandle>,
}

impl TeeActivityLog {
    pub fn new(sinks: Vec<crate::domain::ports::ActivityLogHandle>) -> Self {
        Self { sinks }
    }
}

impl ActivityLog for TeeActivityLog {
    fn record(&self, line: String) {
        for sink in &self.sinks {
            sink.record(line.clone());
        }
    }
}
