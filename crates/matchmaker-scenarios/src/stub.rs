//! Stand-in application handler.
//!
//! The real matchmaker logic ships as a compiled artifact the harness
//! treats as opaque. This double implements just the entry plumbing the
//! scripted scenarios exercise: it mints game addresses, chains moves, and
//! renders a plain listing. It deliberately validates nothing about the
//! game itself; move legality and state reduction stay the application's
//! contract, not ours.

use async_trait::async_trait;
use serde_json::{json, Value};

use matchmaker_harness::{CallContext, CallResult, ZomeHandler};

use crate::api::{
    CreateGameArgs, Game, MakeMoveArgs, Move, MoveType, RenderStateArgs, MAIN_ZOME,
};

const GAME_ENTRY: &str = "game";
const MOVE_ENTRY: &str = "move";

/// Test double for the matchmaker application artifact
pub struct MatchmakerStub;

impl MatchmakerStub {
    fn create_game(&self, ctx: &mut CallContext<'_>, args: Value) -> CallResult {
        let args: CreateGameArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return CallResult::Err(json!(format!("malformed arguments: {}", e))),
        };

        let game = Game {
            player_1: args.opponent,
            player_2: ctx.agent_id().clone(),
            created_at: args.timestamp,
        };
        let content = match serde_json::to_value(&game) {
            Ok(content) => content,
            Err(e) => return CallResult::Err(json!(e.to_string())),
        };
        let address = ctx.commit_entry(GAME_ENTRY, content);
        CallResult::Ok(json!(address.as_str()))
    }

    fn make_move(&self, ctx: &mut CallContext<'_>, args: Value) -> CallResult {
        let args: MakeMoveArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return CallResult::Err(json!(format!("malformed arguments: {}", e))),
        };
        let input = args.new_move;

        if ctx.get_entry(&input.game).is_none() {
            return CallResult::Err(json!("game not found"));
        }

        // Chain onto the latest existing move for this game
        let previous_move = moves_for_game(ctx, &input.game)
            .into_iter()
            .max_by_key(|(_, m)| m.timestamp)
            .map(|(address, _)| address);

        let record = Move {
            game: input.game,
            author: ctx.agent_id().clone(),
            move_type: input.move_type,
            previous_move,
            timestamp: input.timestamp,
        };
        let content = match serde_json::to_value(&record) {
            Ok(content) => content,
            Err(e) => return CallResult::Err(json!(e.to_string())),
        };
        let address = ctx.commit_entry(MOVE_ENTRY, content);
        CallResult::Ok(json!(address.as_str()))
    }

    fn render_state(&self, ctx: &CallContext<'_>, args: Value) -> CallResult {
        let args: RenderStateArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return CallResult::Err(json!(format!("malformed arguments: {}", e))),
        };

        let Some(game_record) = ctx.get_entry(&args.game_address) else {
            return CallResult::Err(json!("game not found"));
        };
        let game: Game = match serde_json::from_value(game_record.content) {
            Ok(game) => game,
            Err(e) => return CallResult::Err(json!(format!("corrupt game entry: {}", e))),
        };

        let mut moves = moves_for_game(ctx, &args.game_address);
        moves.sort_by_key(|(_, m)| m.timestamp);

        let mut rendered = format!(
            "Game {}\n  player 1: {}\n  player 2: {}\n",
            args.game_address, game.player_1, game.player_2
        );
        for (_, m) in &moves {
            let described = match &m.move_type {
                MoveType::Suggest { suggestion } => format!("Suggest {}", suggestion),
                MoveType::Predict { prediction } => format!("Predict {}", prediction),
                MoveType::Swap {} => "Swap".to_string(),
            };
            rendered.push_str(&format!("  t={} {} by {}\n", m.timestamp, described, m.author));
        }
        CallResult::Ok(json!(rendered))
    }
}

/// All visible moves belonging to one game
fn moves_for_game(
    ctx: &CallContext<'_>,
    game: &matchmaker_harness::Address,
) -> Vec<(matchmaker_harness::Address, Move)> {
    ctx.entries_of_type(MOVE_ENTRY)
        .into_iter()
        .filter_map(|(address, record)| {
            serde_json::from_value::<Move>(record.content)
                .ok()
                .filter(|m| m.game == *game)
                .map(|m| (address, m))
        })
        .collect()
}

#[async_trait]
impl ZomeHandler for MatchmakerStub {
    async fn handle(
        &self,
        ctx: &mut CallContext<'_>,
        zome: &str,
        func: &str,
        args: Value,
    ) -> CallResult {
        if zome != MAIN_ZOME {
            return CallResult::Err(json!(format!("unknown zome: {}", zome)));
        }
        match func {
            "create_game" => self.create_game(ctx, args),
            "make_move" => self.make_move(ctx, args),
            "render_state" => self.render_state(ctx, args),
            other => CallResult::Err(json!(format!("unknown function: {}", other))),
        }
    }
}
