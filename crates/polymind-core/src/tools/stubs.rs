//! Placeholder tools for analysis and scheduling
//!
//! Deterministic stand-ins until real backends exist. They acknowledge the
//! request in a fixed format and never fail.

use async_trait::async_trait;

use super::ToolHandler;
use crate::error::AiError;

/// How much of the input the analysis echo keeps
const ANALYSIS_PREVIEW_CHARS: usize = 100;

/// Echoes a preview of the data it was asked to analyze
pub struct DataAnalysisTool;

#[async_trait]
impl ToolHandler for DataAnalysisTool {
    fn name(&self) -> &str {
        "data_analysis"
    }

    fn description(&self) -> &str {
        "Analyze data and provide insights"
    }

    async fn call(&self, input: &str) -> Result<String, AiError> {
        let preview: String = input.chars().take(ANALYSIS_PREVIEW_CHARS).collect();
        Ok(format!("Analysis of data: {}... (truncated)", preview))
    }
}

/// Acknowledges a task without persisting it anywhere
pub struct TaskSchedulerTool;

#[async_trait]
impl ToolHandler for TaskSchedulerTool {
    fn name(&self) -> &str {
        "task_scheduler"
    }

    fn description(&self) -> &str {
        "Schedule and manage tasks"
    }

    async fn call(&self, input: &str) -> Result<String, AiError> {
        Ok(format!("Task scheduled: {}", input))
    }
}
