use anyhow::{Result, ensure};

use imposter_game::{
    CascadeStage, DifficultyFilter, EndTrigger, GameSettings, PlayerId, ReasonCode, Side,
    TriggerKind, TurnTimeoutPolicy,
};

use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};
use crate::logic::policy::TableStrategy;

/// Logic scenario: a named simulation plan.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn resolved_expectation(summary: &SimulationSummary) -> Result<()> {
    let result = summary
        .result
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("round never resolved"))?;
    ensure!(summary.trigger.is_some(), "result without a trigger");
    ensure!(
        result.winning_side == result.reason.winning_side(),
        "winner {:?} disagrees with reason {}",
        result.winning_side,
        result.reason
    );
    ensure!(
        result.imposter_names.len() == summary.imposter_seats.len(),
        "result names {} imposters, table had {}",
        result.imposter_names.len(),
        summary.imposter_seats.len()
    );
    ensure!(
        result.secret_word.as_deref() == Some(summary.secret_word.as_str()),
        "result hides the secret word"
    );
    Ok(())
}

fn seat_of(id: &PlayerId) -> Option<usize> {
    id.as_str().strip_prefix("p-")?.parse().ok()
}

fn vote_matches_roles(summary: &SimulationSummary) -> Result<()> {
    let voted = match &summary.trigger {
        Some(EndTrigger::ManualVote { voted } | EndTrigger::TotalTimeUp { vote: Some(voted) }) => {
            voted
        }
        _ => return Ok(()),
    };
    let seat = seat_of(voted).ok_or_else(|| anyhow::anyhow!("unparseable id {voted}"))?;
    let expected = if summary.imposter_seats.contains(&seat) {
        ReasonCode::VoteCorrect
    } else {
        ReasonCode::VoteWrong
    };
    let actual = summary.result.as_ref().map(|r| r.reason);
    ensure!(
        actual == Some(expected),
        "vote for seat {seat} produced {actual:?}, expected {expected}"
    );
    Ok(())
}

fn expect_trigger(kind: TriggerKind) -> impl Fn(&SimulationSummary) -> Result<()> + Send + Sync {
    move |summary| {
        let actual = summary.trigger.as_ref().map(EndTrigger::kind);
        ensure!(
            actual == Some(kind),
            "expected {kind:?} trigger, got {actual:?}"
        );
        Ok(())
    }
}

fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(4, TableStrategy::Steady)
            .with_expectation(resolved_expectation)
            .with_expectation(vote_matches_roles),
    )
}

fn emergency_vote_scenario() -> TestScenario {
    TestScenario::simulation(
        "Emergency Vote",
        SimulationPlan::new(5, TableStrategy::Sleuth)
            .with_expectation(resolved_expectation)
            .with_expectation(expect_trigger(TriggerKind::ManualVote))
            .with_expectation(vote_matches_roles),
    )
}

fn imposter_guess_scenario() -> TestScenario {
    TestScenario::simulation(
        "Imposter Guess",
        SimulationPlan::new(4, TableStrategy::BoldImposter)
            .with_expectation(resolved_expectation)
            .with_expectation(expect_trigger(TriggerKind::ImposterGuess))
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                let reason = summary.result.as_ref().map(|r| r.reason);
                ensure!(
                    matches!(
                        reason,
                        Some(ReasonCode::GuessCorrect | ReasonCode::GuessWrong)
                    ),
                    "guess produced {reason:?}"
                );
                Ok(())
            }),
    )
}

fn total_timeout_scenario() -> TestScenario {
    let settings = GameSettings {
        total_time_secs: 45,
        ..GameSettings::default()
    };
    TestScenario::simulation(
        "Total Time Expiry",
        SimulationPlan::new(4, TableStrategy::Steady)
            .with_settings(settings)
            .with_expectation(resolved_expectation)
            .with_expectation(expect_trigger(TriggerKind::TotalTimeUp))
            .with_expectation(vote_matches_roles)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                ensure!(
                    summary.ticks == 45 && summary.total_remaining == 0,
                    "clock stopped at {} after {} ticks",
                    summary.total_remaining,
                    summary.ticks
                );
                Ok(())
            }),
    )
}

fn turn_timeout_scenario() -> TestScenario {
    TestScenario::simulation(
        "Turn Timeout (neutral)",
        SimulationPlan::new(4, TableStrategy::Silent)
            .with_expectation(resolved_expectation)
            .with_expectation(expect_trigger(TriggerKind::TurnTimeUp))
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                ensure!(
                    summary.result.as_ref().is_some_and(|r| r.is_no_contest()),
                    "neutral turn timeout declared a winner"
                );
                Ok(())
            }),
    )
}

fn attributed_timeout_scenario() -> TestScenario {
    let settings = GameSettings {
        turn_timeout: TurnTimeoutPolicy::AttributeToSpeaker,
        ..GameSettings::default()
    };
    TestScenario::simulation(
        "Turn Timeout (attributed)",
        SimulationPlan::new(4, TableStrategy::Silent)
            .with_settings(settings)
            .with_expectation(resolved_expectation)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                let Some(EndTrigger::TurnTimeUp { speaker }) = &summary.trigger else {
                    anyhow::bail!("expected a turn timeout, got {:?}", summary.trigger);
                };
                let seat = seat_of(speaker)
                    .ok_or_else(|| anyhow::anyhow!("unparseable id {speaker}"))?;
                let expected = if summary.imposter_seats.contains(&seat) {
                    Side::Civilians
                } else {
                    Side::Imposter
                };
                let winner = summary.result.as_ref().and_then(|r| r.winning_side);
                ensure!(
                    winner == Some(expected),
                    "speaker seat {seat} timed out but {winner:?} won"
                );
                Ok(())
            }),
    )
}

fn chaos_scenario() -> TestScenario {
    TestScenario::simulation(
        "Chaotic Table",
        SimulationPlan::new(6, TableStrategy::Chaos)
            .with_settings(GameSettings::default().with_imposters(2))
            .with_max_ticks(2_400)
            .with_expectation(resolved_expectation)
            .with_expectation(vote_matches_roles),
    )
}

fn large_table_scenario() -> TestScenario {
    TestScenario::simulation(
        "Large Table",
        SimulationPlan::new(10, TableStrategy::Sleuth)
            .with_settings(GameSettings::default().with_imposters(3))
            .with_expectation(resolved_expectation)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                ensure!(
                    summary.imposter_seats.len() == 3,
                    "expected 3 imposters, dealt {}",
                    summary.imposter_seats.len()
                );
                Ok(())
            }),
    )
}

fn word_fallback_scenario() -> TestScenario {
    let settings = GameSettings::default()
        .with_categories(["Nowhere"])
        .with_difficulty(DifficultyFilter::Hard);
    TestScenario::simulation(
        "Word Filter Fallback",
        SimulationPlan::new(4, TableStrategy::Sleuth)
            .with_settings(settings)
            .with_expectation(resolved_expectation)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                ensure!(
                    summary.word_stage == CascadeStage::DifficultyOnly,
                    "unknown category resolved at {:?}",
                    summary.word_stage
                );
                Ok(())
            }),
    )
}

fn deterministic_scenario() -> TestScenario {
    let base = SimulationPlan::new(5, TableStrategy::Chaos);
    let replay = base.clone();
    TestScenario::simulation(
        "Deterministic Replay",
        base.with_expectation(move |summary: &SimulationSummary| -> Result<()> {
            let again = GameTester::try_new(false).run_plan(&replay, summary.seed)?;
            ensure!(
                again.secret_word == summary.secret_word
                    && again.imposter_seats == summary.imposter_seats
                    && again.trigger == summary.trigger
                    && again.ticks == summary.ticks,
                "seed {} replayed differently",
                summary.seed
            );
            Ok(())
        }),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke_scenario()),
        "emergency-vote" | "vote" => Some(emergency_vote_scenario()),
        "imposter-guess" | "guess" => Some(imposter_guess_scenario()),
        "total-timeout" => Some(total_timeout_scenario()),
        "turn-timeout" => Some(turn_timeout_scenario()),
        "attributed-timeout" => Some(attributed_timeout_scenario()),
        "chaos" => Some(chaos_scenario()),
        "large-table" | "large" => Some(large_table_scenario()),
        "word-fallback" | "fallback" => Some(word_fallback_scenario()),
        "deterministic" => Some(deterministic_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("emergency-vote", "Emergency Vote"),
        ("imposter-guess", "Imposter Guess"),
        ("total-timeout", "Total Time Expiry"),
        ("turn-timeout", "Turn Timeout (neutral)"),
        ("attributed-timeout", "Turn Timeout (attributed)"),
        ("chaos", "Chaotic Table"),
        ("large-table", "Large Table"),
        ("word-fallback", "Word Filter Fallback"),
        ("deterministic", "Deterministic Replay"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key).expect("listed scenario exists");
            assert_eq!(scenario.name, description);
        }
        assert!(get_scenario("missing").is_none());
    }

    #[test]
    fn listed_scenarios_pass_for_a_few_seeds() {
        let tester = GameTester::try_new(false);
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            for seed in 1..4 {
                let summary = tester.run_plan(&scenario.plan, seed).unwrap();
                for expectation in &scenario.plan.expectations {
                    expectation
                        .evaluate(&summary)
                        .unwrap_or_else(|err| panic!("{key} seed {seed}: {err}"));
                }
            }
        }
    }

    #[test]
    fn seat_ids_parse_back_to_indices() {
        assert_eq!(seat_of(&PlayerId::for_seat(7)), Some(7));
        assert_eq!(seat_of(&PlayerId::from("guest")), None);
    }
}
