//! Scenario execution engine

use anyhow::{Result, bail};
use glam::DVec2;
use std::time::Instant;

use super::actions::ScenarioAction;
use super::definition::ScenarioDefinition;
use super::results::ExecutionReport;
use crate::headless::HeadlessSession;

/// Configuration for scenario executor
#[derive(Debug, Clone, Default)]
pub struct ScenarioExecutorConfig {
    /// Log every action before running it
    pub verbose: bool,
}

/// Executes scenario actions against a headless session
pub struct ScenarioExecutor {
    config: ScenarioExecutorConfig,

    /// Action execution log
    log: Vec<String>,

    /// Actions run so far in the current scenario
    actions_executed: usize,
}

impl ScenarioExecutor {
    /// Create new executor with default config
    pub fn new() -> Self {
        Self::with_config(ScenarioExecutorConfig::default())
    }

    /// Create new executor with custom config
    pub fn with_config(config: ScenarioExecutorConfig) -> Self {
        Self {
            config,
            log: Vec::new(),
            actions_executed: 0,
        }
    }

    /// Execute a complete scenario
    pub fn execute_scenario(
        &mut self,
        scenario: &ScenarioDefinition,
        session: &mut HeadlessSession,
    ) -> Result<ExecutionReport> {
        let start_time = Instant::now();
        let mut report = ExecutionReport::new(scenario.name.clone());
        let ticks_before = session.tick_times().len();
        let snapshots_before = session.snapshots().len();

        self.log.clear();
        self.actions_executed = 0;

        self.log(&format!("Starting scenario: {}", scenario.name));
        if !scenario.description.is_empty() {
            self.log(&format!("Description: {}", scenario.description));
        }

        // Execute setup actions
        let setup_start = Instant::now();
        if !scenario.setup.is_empty() {
            self.log(&format!("Running {} setup actions", scenario.setup.len()));
            self.run_actions("Setup action", &scenario.setup, session, &mut report)?;
        }
        report.performance.setup_duration_ms = setup_start.elapsed().as_secs_f64() * 1000.0;

        // Execute main actions
        let action_start = Instant::now();
        self.log(&format!("Running {} main actions", scenario.actions.len()));
        self.run_actions("Action", &scenario.actions, session, &mut report)?;
        report.performance.action_duration_ms = action_start.elapsed().as_secs_f64() * 1000.0;

        // Run verifications
        let verify_start = Instant::now();
        if !scenario.verify.is_empty() {
            self.log(&format!("Running {} verifications", scenario.verify.len()));
            for condition in &scenario.verify {
                let result = condition.evaluate(session.simulation());
                self.log(&format!(
                    "  {} {}",
                    if result.passed { "✓" } else { "✗" },
                    result.message
                ));

                if !result.passed {
                    report.verification_failures.push(result);
                }
            }
        }
        report.performance.verification_duration_ms =
            verify_start.elapsed().as_secs_f64() * 1000.0;

        // Finalize report
        let sim = session.simulation();
        report.final_tick = sim.tick();
        report.cell_count = sim.world().len();
        report.stats = session.stats();
        report.actions_executed = self.actions_executed;
        report.snapshots = session.snapshots()[snapshots_before..]
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        report.passed = report.success();

        report.performance.total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        report
            .performance
            .record_ticks(&session.tick_times()[ticks_before..]);

        self.log(&format!(
            "Scenario complete: {} ({} ticks, {} cells, {:.1}ms)",
            if report.passed { "PASSED" } else { "FAILED" },
            report.performance.tick_count,
            report.cell_count,
            report.performance.total_duration_ms
        ));
        self.log(&format!("  Performance: {}", report.performance.summary()));
        report.log = self.log.clone();

        Ok(report)
    }

    fn run_actions(
        &mut self,
        phase: &str,
        actions: &[ScenarioAction],
        session: &mut HeadlessSession,
        report: &mut ExecutionReport,
    ) -> Result<()> {
        for (idx, action) in actions.iter().enumerate() {
            if let Err(e) = self.execute_action(action, session) {
                let msg = format!("{} {} failed: {}", phase, idx, e);
                self.log(&msg);
                report.log = self.log.clone();
                bail!(msg);
            }
            self.actions_executed += 1;
        }
        Ok(())
    }

    /// Execute a single action
    fn execute_action(
        &mut self,
        action: &ScenarioAction,
        session: &mut HeadlessSession,
    ) -> Result<()> {
        if self.config.verbose {
            self.log(&format!(
                "[Tick {}] {:?}",
                session.simulation().tick(),
                action
            ));
        }

        match action {
            ScenarioAction::Paint { x, y, material } => {
                match session.click(DVec2::new(*x, *y), *material) {
                    Some(id) => self.log(&format!("  Painted {} at ({}, {})", id, x, y)),
                    None => self.log(&format!("  Nothing painted at ({}, {})", x, y)),
                }
            }

            ScenarioAction::Stroke {
                from,
                to,
                steps,
                material,
            } => {
                let painted = session.drag(
                    DVec2::new(from.0, from.1),
                    DVec2::new(to.0, to.1),
                    *steps,
                    *material,
                );
                self.log(&format!(
                    "  Stroke {:?} -> {:?} painted {} cells",
                    from,
                    to,
                    painted.len()
                ));
            }

            ScenarioAction::PressKey { key } => {
                if !session.press_key(*key) {
                    bail!("No material bound to key {:?}", key);
                }
                self.log(&format!(
                    "  Brush: {:?}",
                    session.input().selected_material
                ));
            }

            ScenarioAction::Wait { ticks } => {
                session.run(*ticks)?;
            }

            ScenarioAction::Pan { dx, dy } => {
                session.view_mut().pan(DVec2::new(*dx, *dy));
            }

            ScenarioAction::Zoom { scale, center } => {
                if *scale <= 0.0 {
                    bail!("Zoom scale must be positive, got {}", scale);
                }
                let center = center.map(|(x, y)| DVec2::new(x, y));
                session.view_mut().zoom(*scale, center);
            }

            ScenarioAction::Snapshot { name } => {
                let path = session.snapshot(name)?;
                self.log(&format!("  Snapshot saved: {}", path.display()));
            }

            ScenarioAction::Log { message } => {
                self.log(&format!("  [LOG] {}", message));
            }
        }

        Ok(())
    }

    fn log(&mut self, message: &str) {
        log::info!("{}", message);
        self.log.push(message.to_string());
    }
}

impl Default for ScenarioExecutor {
    fn default() -> Self {
        Self::new()
    }
}
