//! Scripted scenarios: RON files of input actions followed by checks

mod actions;
mod definition;
mod executor;
mod results;
mod verification;

pub use actions::ScenarioAction;
pub use definition::ScenarioDefinition;
pub use executor::{ScenarioExecutor, ScenarioExecutorConfig};
pub use results::{ExecutionReport, PerformanceMetrics};
pub use verification::{VerificationCondition, VerificationResult};
