//! The scripted scenarios.
//!
//! One scenario is registered: two participants, four sequential calls.
//! Every call is awaited to completion before the next one runs; the
//! instance handles are only borrowed from the harness and never
//! reassigned.

use anyhow::Context;

use matchmaker_harness::{
    Address, Harness, HarnessResult, Instances, ScenarioHandle, TestHandle,
};

use crate::api::{CreateGameArgs, MakeMoveArgs, MoveInput, MoveType, RenderStateArgs, MAIN_ZOME};

/// Register every scripted scenario with the harness
pub fn register_scenarios(harness: &mut Harness) -> HarnessResult<()> {
    harness.register_scenario("Can create a new game", |s, t, instances| {
        Box::pin(can_create_a_new_game(s, t, instances))
    })?;
    Ok(())
}

async fn can_create_a_new_game(
    s: ScenarioHandle,
    t: TestHandle,
    instances: Instances,
) -> anyhow::Result<()> {
    let alice = instances
        .get("alice")
        .cloned()
        .context("alice not configured")?;
    let bob = instances.get("bob").cloned().context("bob not configured")?;

    // alice opens a game against bob
    let create_game_result = alice
        .call_sync(
            MAIN_ZOME,
            "create_game",
            serde_json::to_value(CreateGameArgs {
                opponent: bob.agent_id().clone(),
                timestamp: 0,
            })?,
        )
        .await?;
    let game_address = create_game_result
        .ok()
        .and_then(|value| value.as_str())
        .map(str::to_string);
    t.equal(
        game_address.as_ref().map(|a| a.len()),
        Some(46),
        "game address is 46 characters",
    );
    let game = Address::parse(&game_address.context("create_game returned no identifier")?)?;

    // bob opens with a suggestion
    let make_move_1_result = bob
        .call_sync(
            MAIN_ZOME,
            "make_move",
            serde_json::to_value(MakeMoveArgs {
                new_move: MoveInput {
                    game: game.clone(),
                    move_type: MoveType::Suggest { suggestion: 5 },
                    timestamp: 1,
                },
            })?,
        )
        .await?;
    t.err_absent(&make_move_1_result, "suggest move accepted");

    // alice answers with a prediction
    let make_move_2_result = alice
        .call_sync(
            MAIN_ZOME,
            "make_move",
            serde_json::to_value(MakeMoveArgs {
                new_move: MoveInput {
                    game: game.clone(),
                    move_type: MoveType::Predict { prediction: 5 },
                    timestamp: 2,
                },
            })?,
        )
        .await?;
    t.err_absent(&make_move_2_result, "predict move accepted");

    s.consistency().await;

    // The rendered payload is logged, not validated
    let render_state_result = alice
        .call_sync(
            MAIN_ZOME,
            "render_state",
            serde_json::to_value(RenderStateArgs { game_address: game })?,
        )
        .await?;
    if let Some(state) = render_state_result.ok() {
        tracing::info!(scenario = %s.name(), state = %state, "Rendered game state");
    }
    t.err_absent(&render_state_result, "state renders");

    Ok(())
}
