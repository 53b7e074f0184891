use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::{OutcomeTally, ScenarioResult};

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

fn tally_line(tally: &OutcomeTally) -> String {
    let total = tally.total();
    format!(
        "civilians {} ({:.1}%) | imposter {} ({:.1}%) | no contest {} ({:.1}%)",
        tally.civilians,
        percent(tally.civilians, total),
        tally.imposter,
        percent(tally.imposter, total),
        tally.no_contest,
        percent(tally.no_contest, total)
    )
}

fn reason_line(tally: &OutcomeTally) -> String {
    tally
        .reasons
        .iter()
        .map(|(reason, count)| format!("{reason}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_console_report<W: Write>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Round Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenario runs: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(
        out,
        "Success rate: {:.1}%",
        percent(passed_tests, total_tests)
    )?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Winners: {}", tally_line(&result.outcomes))?;
        writeln!(out, "   Reasons: {}", reason_line(&result.outcomes))?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }

    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Imposter Round Simulation Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenario runs**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    writeln!(
        out,
        "- **Success rate**: {:.1}%\n",
        percent(passed_tests, total_tests)
    )?;

    writeln!(out, "## Outcomes\n")?;
    writeln!(out, "| Scenario | Seed | Civilians | Imposter | No contest |")?;
    writeln!(out, "|---|---|---|---|---|")?;
    for result in results {
        let tally = &result.outcomes;
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            result.scenario_name, result.seed, tally.civilians, tally.imposter, tally.no_contest
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Reasons**: {}", reason_line(&result.outcomes))?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(passed: bool) -> ScenarioResult {
        let mut outcomes = OutcomeTally {
            civilians: 2,
            imposter: 1,
            no_contest: 1,
            ..OutcomeTally::default()
        };
        outcomes.reasons.insert("vote_correct".to_string(), 2);
        outcomes.reasons.insert("guess_correct".to_string(), 1);
        outcomes.reasons.insert("time_expired".to_string(), 1);
        ScenarioResult {
            scenario_name: "Smoke Test".to_string(),
            seed: 42,
            passed,
            iterations_run: 4,
            successful_iterations: if passed { 4 } else { 3 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["round never resolved".to_string()]
            },
            outcomes,
            average_duration: Duration::from_millis(3),
            performance_data: vec![Duration::from_millis(3)],
        }
    }

    #[test]
    fn console_report_lists_winners_and_failures() {
        let mut buf = Vec::new();
        generate_console_report(
            &mut buf,
            &[sample_result(true), sample_result(false)],
            Duration::from_secs(1),
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Smoke Test"));
        assert!(text.contains("civilians 2 (50.0%)"));
        assert!(text.contains("guess_correct=1, time_expired=1, vote_correct=2"));
        assert!(text.contains("round never resolved"));
    }

    #[test]
    fn markdown_report_has_outcome_table() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[sample_result(true)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Imposter Round Simulation Results"));
        assert!(text.contains("| Smoke Test | 42 | 2 | 1 | 1 |"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample_result(true)]).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0].outcomes.civilians, 2);
        assert_eq!(parsed[0].seed, 42);
    }

    #[test]
    fn percent_handles_empty_totals() {
        assert!(percent(0, 0).abs() < f64::EPSILON);
    }
}
