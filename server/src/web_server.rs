use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use omok_common::defaults::BOARD_SIZE;
use omok_common::games::SessionRng;
use omok_common::games::omok::StrategyKind;
use omok_common::id_generator::generate_game_id;
use omok_common::{GameId, log, warn};

use crate::game_service::{MoveReport, TurnReport, play_turn};
use crate::game_store::{GameLocks, GameStore, StoreError};
use crate::session_record::SessionRecord;

#[derive(Clone)]
pub struct WebServerState<S> {
    pub store: S,
    pub locks: GameLocks,
}

#[derive(Serialize)]
struct InfoResponse {
    size: usize,
    strategies: Vec<&'static str>,
}

#[derive(Serialize)]
struct NewGameResponse {
    response: bool,
    pid: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    response: bool,
    reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveResponse {
    x: usize,
    y: usize,
    is_win: bool,
    is_draw: bool,
    /// Winning line flattened to `[x1, y1, x2, y2, ...]`.
    row: Vec<usize>,
}

impl From<&MoveReport> for MoveResponse {
    fn from(report: &MoveReport) -> Self {
        let row = report
            .outcome
            .winning_line()
            .map(|line| line.cells.iter().flat_map(|p| [p.x, p.y]).collect())
            .unwrap_or_default();
        Self {
            x: report.position.x,
            y: report.position.y,
            is_win: report.outcome.is_win(),
            is_draw: report.outcome.is_draw(),
            row,
        }
    }
}

#[derive(Serialize)]
struct PlayResponse {
    response: bool,
    ack_move: MoveResponse,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    computer_move: Option<MoveResponse>,
}

impl From<&TurnReport> for PlayResponse {
    fn from(report: &TurnReport) -> Self {
        Self {
            response: true,
            ack_move: MoveResponse::from(&report.ack_move),
            computer_move: report.computer_move.as_ref().map(MoveResponse::from),
        }
    }
}

fn reject(reason: impl Into<String>) -> Response {
    Json(ErrorResponse {
        response: false,
        reason: reason.into(),
    })
    .into_response()
}

pub fn build_router<S: GameStore>(store: S) -> Router {
    let state = WebServerState {
        store,
        locks: GameLocks::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/info", get(info_handler))
        .route("/info/index.php", get(info_handler))
        .route("/new", get(new_game_handler::<S>))
        .route("/new/index.php", get(new_game_handler::<S>))
        .route("/play", get(play_handler::<S>))
        .route("/play/index.php", get(play_handler::<S>))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server<S: GameStore>(store: S, addr: SocketAddr) -> std::io::Result<()> {
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log!("Omok server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for Ctrl+C");
            log!("Shutdown signal received");
        })
        .await
}

async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        size: BOARD_SIZE,
        strategies: StrategyKind::names(),
    })
}

async fn new_game_handler<S: GameStore>(
    State(state): State<WebServerState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(name) = params.get("strategy") else {
        return reject("Strategy not specified");
    };
    let Ok(strategy) = name.parse::<StrategyKind>() else {
        return reject("Unknown strategy");
    };

    let game_id = loop {
        let candidate = generate_game_id();
        match state.store.contains(&candidate).await {
            Ok(false) => break candidate,
            Ok(true) => continue,
            Err(e) => {
                warn!("Failed to check game id {}: {}", candidate, e);
                return reject("Unable to create game");
            }
        }
    };

    let record = SessionRecord::new(strategy);
    if let Err(e) = state.store.put(&game_id, &record).await {
        warn!("Failed to store new game {}: {}", game_id, e);
        return reject("Unable to create game");
    }

    log!("Created game {} with strategy {}", game_id, strategy);
    Json(NewGameResponse {
        response: true,
        pid: game_id.into(),
    })
    .into_response()
}

async fn play_handler<S: GameStore>(
    State(state): State<WebServerState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(pid) = params.get("pid") else {
        return reject("Pid not specified");
    };
    let (Some(x), Some(y)) = (params.get("x"), params.get("y")) else {
        return reject("Move not specified");
    };
    let (Ok(x), Ok(y)) = (x.trim().parse::<isize>(), y.trim().parse::<isize>()) else {
        return reject("Move not well-formed");
    };

    let game_id = GameId::from(pid.clone());
    match state.store.contains(&game_id).await {
        Ok(true) => {}
        Ok(false) => return reject("Unknown pid"),
        Err(e) => {
            warn!("Failed to look up game {}: {}", game_id, e);
            return reject("Unable to load game");
        }
    }

    let _guard = state.locks.acquire(&game_id).await;

    let mut record = match state.store.get(&game_id).await {
        Ok(record) => record,
        Err(StoreError::NotFound(_)) => return reject("Unknown pid"),
        Err(e) => {
            warn!("Failed to load game {}: {}", game_id, e);
            return reject("Unable to load game");
        }
    };

    let mut rng = SessionRng::from_random();
    let report = match play_turn(&mut record, x, y, &mut rng) {
        Ok(report) => report,
        Err(e) => {
            log!("Game {}: rejected move ({}, {}): {}", game_id, x, y, e);
            return reject(e.to_string());
        }
    };

    if let Err(e) = state.store.put(&game_id, &record).await {
        warn!("Failed to save game {}: {}", game_id, e);
        return reject("Unable to save game");
    }

    log!(
        "Game {}: human {} -> {:?}, computer {:?}, rng seed {}",
        game_id,
        report.ack_move.position,
        report.ack_move.outcome,
        report.computer_move.as_ref().map(|m| m.position),
        rng.seed()
    );
    Json(PlayResponse::from(&report)).into_response()
}
