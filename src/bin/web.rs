//! Single binary web server: JSON API over the court rotation engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set MATCH_LOG_DIR to append completed matches to CSV files in that directory.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation::{
    complete_match, complete_round, decrement_score, increment_score, reroll_round, set_score,
    start_tournament, CsvMatchLog, MatchId, MatchRecorder, RosterInput, Settings, Side,
    Tournament, TournamentConfig, TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. The write lock keeps commands on one
/// tournament strictly sequential.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Recorder shared by every tournament; `None` when MATCH_LOG_DIR is unset.
type RecorderState = Data<Option<MatchRecorder>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(flatten)]
    roster: RosterInput,
    /// Fixed seed for reproducible pairings.
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct SideBody {
    side: Side,
}

#[derive(Deserialize)]
struct SetScoreBody {
    side: Side,
    value: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::UnknownMatch(_) => HttpResponse::NotFound().json(body),
        TournamentError::InsufficientParticipants { .. } | TournamentError::InsufficientTeams { .. } => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        TournamentError::Validation { .. }
        | TournamentError::InvalidRoster(_)
        | TournamentError::InvalidState(_) => HttpResponse::BadRequest().json(body),
    }
}

/// Look up a tournament, refresh its activity time, apply `command`, and answer with
/// the resulting snapshot.
fn with_tournament<F>(state: &AppState, id: TournamentId, command: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match command(t) {
        Ok(()) => HttpResponse::Ok().json(t.snapshot()),
        Err(e) => {
            log::debug!("Tournament {}: command rejected: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation",
    })
}

/// Create a tournament from the setup roster and schedule round 1.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    recorder: RecorderState,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let config = match TournamentConfig::from_input(body.roster) {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };
    let mut tournament = match body.seed {
        Some(seed) => Tournament::with_seed(config, seed),
        None => Tournament::new(config),
    };
    if let Err(e) = start_tournament(&mut tournament) {
        return error_response(&e);
    }
    if let Some(r) = recorder.get_ref() {
        tournament.attach_recorder(r.clone());
    }

    let snapshot = tournament.snapshot();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {} ({})", snapshot.name, snapshot.id);
    HttpResponse::Ok().json(snapshot)
}

/// Get a tournament snapshot by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Completed matches, newest first.
#[get("/api/tournaments/{id}/history")]
async fn api_history(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            let history: Vec<_> = entry.tournament.history().iter().collect();
            HttpResponse::Ok().json(history)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Draw the current round again (abandons its active matches).
#[post("/api/tournaments/{id}/round/reroll")]
async fn api_reroll_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, reroll_round)
}

/// Complete all active matches and schedule the next round.
#[post("/api/tournaments/{id}/round/complete")]
async fn api_complete_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| complete_round(t).map(|_| ()))
}

#[post("/api/tournaments/{id}/matches/{match_id}/increment")]
async fn api_increment(state: AppState, path: Path<MatchPath>, body: Json<SideBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| increment_score(t, path.match_id, body.side))
}

#[post("/api/tournaments/{id}/matches/{match_id}/decrement")]
async fn api_decrement(state: AppState, path: Path<MatchPath>, body: Json<SideBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| decrement_score(t, path.match_id, body.side))
}

/// Enter one side's score; the other side becomes target - value.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_set_score(state: AppState, path: Path<MatchPath>, body: Json<SetScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| set_score(t, path.match_id, body.side, body.value))
}

#[post("/api/tournaments/{id}/matches/{match_id}/complete")]
async fn api_complete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| complete_match(t, path.match_id).map(|_| ()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    let recorder = match &settings.match_log_dir {
        Some(dir) => {
            log::info!("Writing match log to {:?}", dir);
            Some(MatchRecorder::spawn(CsvMatchLog::new(dir))?)
        }
        None => {
            log::info!("MATCH_LOG_DIR not set; completed matches are not logged");
            None
        }
    };

    let bind = (settings.host.clone(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let recorder: RecorderState = Data::new(recorder);

    // Background task: every 30 minutes, remove tournaments inactive past the timeout
    let state_cleanup = state.clone();
    let timeout = settings.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(recorder.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_history)
            .service(api_reroll_round)
            .service(api_complete_round)
            .service(api_increment)
            .service(api_decrement)
            .service(api_set_score)
            .service(api_complete_match)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[::core::prelude::v1::test]
    fn error_status_mapping() {
        let cases = [
            (
                TournamentError::Validation {
                    value: 17,
                    target_points: 16,
                },
                StatusCode::BAD_REQUEST,
            ),
            (TournamentError::InvalidRoster("x".into()), StatusCode::BAD_REQUEST),
            (TournamentError::InvalidState("x"), StatusCode::BAD_REQUEST),
            (
                TournamentError::UnknownMatch(MatchId::nil()),
                StatusCode::NOT_FOUND,
            ),
            (
                TournamentError::InsufficientParticipants {
                    available: 3,
                    required: 4,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                TournamentError::InsufficientTeams {
                    available: 1,
                    required: 2,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error_response(&error).status(), status, "{error}");
        }
    }

    #[actix_web::test]
    async fn create_score_and_complete_over_http() {
        let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
        let recorder: RecorderState = Data::new(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(recorder)
                .service(api_create_tournament)
                .service(api_set_score)
                .service(api_complete_match)
                .service(api_history),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({
                "name": "Court night",
                "players": ["Ana", "Ben", "Cid", "Dee", "Eve"],
                "seed": 3
            }))
            .to_request();
        let snap: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snap["round"], 1);
        assert_eq!(snap["sitting_out"].as_array().map(|s| s.len()), Some(1));
        let id = snap["id"].as_str().unwrap().to_string();
        let match_id = snap["matches"][0]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/tournaments/{id}/matches/{match_id}/score"))
            .set_json(serde_json::json!({ "side": "a", "value": 17 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/api/tournaments/{id}/matches/{match_id}/score"))
            .set_json(serde_json::json!({ "side": "a", "value": 10 }))
            .to_request();
        let snap: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snap["matches"][0]["side_b"]["score"], 6);

        let uri = format!("/api/tournaments/{id}/matches/{match_id}/complete");
        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/history"))
            .to_request();
        let history: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.as_array().map(|h| h.len()), Some(1));
        assert_eq!(history[0]["status"], "completed");
    }

    #[actix_web::test]
    async fn too_small_roster_is_unprocessable() {
        let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
        let recorder: RecorderState = Data::new(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(recorder)
                .service(api_create_tournament),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Short", "players": ["Ana", "Ben", "Cid"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.read().unwrap().is_empty());
    }
}
