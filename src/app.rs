// Service orchestration: the event loop between the WebSocket transport
// and the auction ledger. Every incoming request frame is parsed,
// dispatched, and answered with exactly one reply frame.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::ledger::Ledger;
use crate::players::{PlayerDirectory, DEFAULT_SEARCH_LIMIT};
use crate::protocol::{ClientRequest, ServiceReply};
use crate::ws_server::WsEvent;

/// Everything the dispatch layer needs: the ledger and the player
/// directory it answers searches from.
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub directory: PlayerDirectory,
}

/// Run the service event loop until the transport channel closes.
pub async fn run(
    mut ws_rx: mpsc::Receiver<WsEvent>,
    reply_tx: mpsc::Sender<String>,
    state: AppState,
) -> anyhow::Result<()> {
    info!("Service event loop started");

    while let Some(event) = ws_rx.recv().await {
        match event {
            WsEvent::Connected { addr } => {
                info!("Client connected from {addr}");
            }
            WsEvent::Disconnected => {
                info!("Client disconnected");
            }
            WsEvent::Request(json) => {
                let reply = handle_request(&state, &json);
                let encoded = serde_json::to_string(&reply)?;
                if reply_tx.send(encoded).await.is_err() {
                    info!("Reply channel closed, shutting down");
                    break;
                }
            }
        }
    }

    info!("Service event loop exiting");
    Ok(())
}

/// Parse one raw request frame and produce its reply. Unparseable frames
/// get a `bad_request` error reply instead of being dropped silently.
pub fn handle_request(state: &AppState, json: &str) -> ServiceReply {
    let request: ClientRequest = match serde_json::from_str(json) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse client request: {e}");
            return ServiceReply::bad_request(e.to_string());
        }
    };
    dispatch(state, request)
}

/// Route a parsed request to the ledger or the player directory.
pub fn dispatch(state: &AppState, request: ClientRequest) -> ServiceReply {
    let result = match request {
        ClientRequest::CreateLeague { config } => {
            state.ledger.create_league(&config).map(ServiceReply::league)
        }
        ClientRequest::CreateDemoLeague => {
            state.ledger.create_demo_league().map(ServiceReply::league)
        }
        ClientRequest::GetLeague { league_id } => {
            state.ledger.get_league(&league_id).map(ServiceReply::league)
        }
        ClientRequest::ListLeagues => state
            .ledger
            .list_leagues()
            .map(|leagues| ServiceReply::Leagues { leagues }),
        ClientRequest::DraftPick {
            league_id,
            team_id,
            player,
            amount,
        } => state
            .ledger
            .draft_pick(&league_id, &team_id, player, amount)
            .map(ServiceReply::league),
        ClientRequest::UndoPick { league_id, pick_id } => state
            .ledger
            .undo_pick(&league_id, &pick_id)
            .map(ServiceReply::league),
        ClientRequest::UpdateSettings { league_id, config } => state
            .ledger
            .update_settings(&league_id, &config)
            .map(ServiceReply::league),
        ClientRequest::RenameTeam {
            league_id,
            team_id,
            update,
        } => state
            .ledger
            .rename_team(&league_id, &team_id, &update)
            .map(ServiceReply::league),
        ClientRequest::SearchPlayers {
            query,
            position,
            limit,
        } => {
            let players = state.directory.search(
                &query,
                position.as_deref(),
                limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            );
            return ServiceReply::Players { players };
        }
    };

    match result {
        Ok(reply) => reply,
        Err(e) => ServiceReply::from_error(&e),
    }
}
