//! Process memory and engine diagnostics recorded around solves.

use std::time::Instant;
use sysinfo::System;

/// Resident set size of this process at one point of a solve.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    pub rss_bytes: u64,
    pub timestamp: Instant,
    pub stage: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "[PROCESS_NOT_FOUND] failed to locate process {}", pid)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

impl MemorySnapshot {
    /// Capture the current RSS, refreshing only this process.
    ///
    /// # Errors
    ///
    /// Returns an error if the current process cannot be located.
    pub fn capture(stage: &'static str) -> Result<Self, MemoryError> {
        let pid = sysinfo::Pid::from_u32(std::process::id());
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[pid]),
            true,
            sysinfo::ProcessRefreshKind::nothing().with_memory(),
        );
        let process = sys.process(pid).ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })?;
        Ok(MemorySnapshot {
            rss_bytes: process.memory(),
            timestamp: Instant::now(),
            stage,
        })
    }

    /// RSS growth since `earlier` (negative when memory was released).
    pub fn delta_since(&self, earlier: &Self) -> i64 {
        i64::try_from(self.rss_bytes).unwrap_or(i64::MAX)
            - i64::try_from(earlier.rss_bytes).unwrap_or(i64::MAX)
    }
}

pub(crate) fn capture_rss(stage: &'static str) -> Option<MemorySnapshot> {
    MemorySnapshot::capture(stage).ok()
}

pub(crate) fn rss_delta(before: Option<&MemorySnapshot>, after: Option<&MemorySnapshot>) -> Option<i64> {
    match (before, after) {
        (Some(before), Some(after)) => Some(after.delta_since(before)),
        _ => None,
    }
}

/// Static facts about the linked engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub name: &'static str,
    pub version: String,
}

pub fn engine_info() -> EngineInfo {
    EngineInfo {
        name: "highs",
        version: crate::ffi::highs_version().unwrap_or_else(|| "unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_current_process() {
        let snapshot = MemorySnapshot::capture("test").unwrap();
        assert!(snapshot.rss_bytes > 0);
        assert_eq!(snapshot.stage, "test");
    }

    #[test]
    fn test_rss_delta() {
        let now = Instant::now();
        let before = MemorySnapshot {
            rss_bytes: 1000,
            timestamp: now,
            stage: "before",
        };
        let after = MemorySnapshot {
            rss_bytes: 400,
            timestamp: now,
            stage: "after",
        };
        assert_eq!(rss_delta(Some(&before), Some(&after)), Some(-600));
        assert_eq!(rss_delta(None, Some(&after)), None);
    }

    #[test]
    fn test_engine_info_names_highs() {
        let info = engine_info();
        assert_eq!(info.name, "highs");
        assert!(!info.version.is_empty());
    }
}
