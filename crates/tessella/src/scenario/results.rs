//! Execution results and reporting

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessella_core::world::TickStats;

use super::verification::VerificationResult;

/// Performance metrics for a scenario execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total wall-clock time (milliseconds)
    pub total_duration_ms: f64,

    /// Setup phase duration (milliseconds)
    pub setup_duration_ms: f64,

    /// Main action phase duration (milliseconds)
    pub action_duration_ms: f64,

    /// Verification phase duration (milliseconds)
    pub verification_duration_ms: f64,

    /// Average time per tick (milliseconds)
    pub avg_tick_time_ms: f64,

    /// Slowest tick (milliseconds)
    pub peak_tick_time_ms: f64,

    /// Number of simulation ticks
    pub tick_count: usize,
}

impl PerformanceMetrics {
    /// Fill the tick figures from per-tick timings
    pub fn record_ticks(&mut self, tick_times: &[f64]) {
        self.tick_count = tick_times.len();
        if tick_times.is_empty() {
            return;
        }
        self.avg_tick_time_ms = tick_times.iter().sum::<f64>() / tick_times.len() as f64;
        self.peak_tick_time_ms = tick_times.iter().copied().fold(0.0, f64::max);
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.1}ms | Avg tick: {:.2}ms | Peak: {:.2}ms | Ticks: {}",
            self.total_duration_ms, self.avg_tick_time_ms, self.peak_tick_time_ms, self.tick_count
        )
    }
}

/// Report from scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Scenario name
    pub scenario_name: String,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Overall pass/fail status
    pub passed: bool,

    /// Simulation tick when the scenario finished
    pub final_tick: u64,

    /// Number of actions executed
    pub actions_executed: usize,

    /// Live cells when the scenario finished
    pub cell_count: usize,

    /// Edits made while the scenario ran
    pub stats: TickStats,

    /// Verification failures (empty if all passed)
    pub verification_failures: Vec<VerificationResult>,

    /// Execution log messages
    pub log: Vec<String>,

    /// Snapshot file paths
    pub snapshots: Vec<String>,

    /// Performance metrics (timing, throughput)
    pub performance: PerformanceMetrics,
}

impl ExecutionReport {
    /// Create new execution report
    pub fn new(scenario_name: String) -> Self {
        Self {
            scenario_name,
            timestamp: chrono::Utc::now().to_rfc3339(),
            passed: false,
            final_tick: 0,
            actions_executed: 0,
            cell_count: 0,
            stats: TickStats::default(),
            verification_failures: Vec::new(),
            log: Vec::new(),
            snapshots: Vec::new(),
            performance: PerformanceMetrics::default(),
        }
    }

    /// Check if all verifications passed
    pub fn success(&self) -> bool {
        self.verification_failures.is_empty()
    }

    /// Save report to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize execution report to JSON")?;

        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path.as_ref(), json).with_context(|| {
            format!(
                "Failed to write execution report: {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }

    /// Load report from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read report file: {}", path.as_ref().display()))?;

        let report = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON report: {}", path.as_ref().display()))?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_report_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("sand.json");

        let mut report = ExecutionReport::new("Sand pile".to_string());
        report.passed = true;
        report.final_tick = 120;
        report.stats.moves = 17;
        report.log.push("Test log message".to_string());

        report.save_json(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"final_tick\": 120"));

        let loaded = ExecutionReport::from_json(&path).unwrap();
        assert_eq!(loaded.scenario_name, "Sand pile");
        assert_eq!(loaded.stats.moves, 17);
        assert_eq!(loaded.log, report.log);
    }

    #[test]
    fn test_success_check() {
        let mut report = ExecutionReport::new("Test".to_string());
        assert!(report.success(), "Should succeed with no failures");

        report.verification_failures.push(VerificationResult {
            passed: false,
            message: "Test failure".to_string(),
            actual_value: None,
        });
        assert!(!report.success(), "Should fail with verification failures");
    }

    #[test]
    fn test_record_ticks() {
        let mut metrics = PerformanceMetrics::default();
        metrics.record_ticks(&[1.0, 3.0, 2.0]);

        assert_eq!(metrics.tick_count, 3);
        assert_eq!(metrics.avg_tick_time_ms, 2.0);
        assert_eq!(metrics.peak_tick_time_ms, 3.0);
        assert!(metrics.summary().contains("Ticks: 3"));
    }
}
