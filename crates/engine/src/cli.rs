//! Console rendering for the one-shot runner binary.

use std::fmt::Write as _;

use crate::use_cases::PipelineOutcome;

const RULE: &str =
    "================================================================================";

/// Whether the run should exit with status 0.
pub fn succeeded(outcome: &PipelineOutcome) -> bool {
    matches!(outcome, PipelineOutcome::Executed(_))
}

/// Human-readable trace of one pipeline run: the compiled command, the
/// response ids, the first action's status, and every dialogue line.
pub fn render_outcome(input: &str, outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}\nSQUADLINK PIPELINE\n{RULE}");
    let _ = writeln!(out, "Input: {input}");

    let report = match outcome {
        PipelineOutcome::Executed(report) => report,
        PipelineOutcome::NotUnderstood {
            attempts, failures, ..
        } => {
            let _ = writeln!(out, "FAILED: no valid command after {attempts} attempt(s)");
            for (i, failure) in failures.iter().enumerate() {
                let _ = writeln!(out, "  attempt {}: {failure}", i + 1);
            }
            return out;
        }
    };

    let command_json = serde_json::to_string_pretty(&report.command)
        .unwrap_or_else(|e| format!("<unserializable command: {e}>"));
    let attempts = report.attempts;
    let _ = writeln!(out, "\nCommand (attempt {attempts}):\n{command_json}");

    let ids: Vec<&str> = report
        .response
        .actions
        .iter()
        .map(|r| r.response_id.as_str())
        .collect();
    let _ = writeln!(out, "\nResponse: {}", ids.join(", "));
    if let Some((result, _)) = report.primary() {
        let _ = writeln!(out, "  Status: {}", result.status);
        if let Some(reason) = &result.reason {
            let _ = writeln!(out, "  Reason: {reason}");
        }
    }

    let _ = writeln!(out, "\nDialogue:");
    for line in &report.dialogue {
        let _ = writeln!(out, "  {line}");
    }

    let t = report.timings;
    let _ = writeln!(
        out,
        "\nTiming: compile {}ms, dispatch {}ms, dialogue {}ms, total {}ms",
        t.compile_ms, t.dispatch_ms, t.dialogue_ms, t.total_ms
    );
    let _ = writeln!(out, "{RULE}");
    out
}
