//! Single binary web server: REST API over in-memory leagues.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! LEAGUE_TTL_HOURS, CLEANUP_INTERVAL_MINUTES.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_league_web::config::ServerConfig;
use doubles_league_web::roster::{import_roster, leaderboard_csv};
use doubles_league_web::{
    clear_score, generate_round, record_score, regenerate_last_round, GeneratorOptions, League,
    LeagueError, LeagueId, MatchId, PlayerId, RoundId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

/// Per-league entry: league data + last activity time (for auto-cleanup).
struct LeagueEntry {
    league: League,
    last_activity: Instant,
}

/// In-memory state: many leagues by ID. Idle entries are removed by a background sweep.
type AppState = Data<RwLock<HashMap<LeagueId, LeagueEntry>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateLeagueBody {
    #[serde(default = "default_league_name")]
    name: String,
    #[serde(default = "default_courts")]
    courts: u32,
}

fn default_league_name() -> String {
    "League".to_string()
}

fn default_courts() -> u32 {
    1
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default = "default_level")]
    level: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Deserialize)]
struct SetActiveBody {
    active: bool,
}

#[derive(Deserialize)]
struct SetLevelBody {
    level: u32,
}

#[derive(Deserialize)]
struct SetCourtsBody {
    courts: u32,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct ScoreBody {
    games_a: u32,
    games_b: u32,
}

/// Path segment: league id (e.g. /api/leagues/{id})
#[derive(Deserialize)]
struct LeaguePath {
    id: LeagueId,
}

/// Path segments: league id and player id
#[derive(Deserialize)]
struct LeaguePlayerPath {
    id: LeagueId,
    player_id: PlayerId,
}

/// Path segments: league id, round id and match id
#[derive(Deserialize)]
struct LeagueMatchPath {
    id: LeagueId,
    round_id: RoundId,
    match_id: MatchId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No league" }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Look up a league and refresh its activity time.
fn touch(g: &mut HashMap<LeagueId, LeagueEntry>, id: LeagueId) -> Option<&mut League> {
    g.get_mut(&id).map(|entry| {
        entry.last_activity = Instant::now();
        &mut entry.league
    })
}

/// Answer with the updated league, or the domain error as 400.
fn respond<T>(league: &League, result: Result<T, LeagueError>) -> HttpResponse {
    match result {
        Ok(_) => HttpResponse::Ok().json(league),
        Err(e) => bad_request(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-league-web",
    })
}

/// Create a new league (returns it with id; client stores id for subsequent requests).
#[post("/api/leagues")]
async fn api_create_league(state: AppState, body: Option<Json<CreateLeagueBody>>) -> HttpResponse {
    let (name, courts) = body
        .map(|b| (b.name.clone(), b.courts))
        .unwrap_or_else(|| (default_league_name(), default_courts()));
    let league = match League::new(name, courts) {
        Ok(l) => l,
        Err(e) => return bad_request(e),
    };
    log::info!("Created league {} with {} court(s)", league.id, league.courts);
    let response = HttpResponse::Ok().json(&league);
    let mut g = state.write().await;
    g.insert(
        league.id,
        LeagueEntry {
            league,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a league by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/leagues/{id}")]
async fn api_get_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = state.write().await;
    match touch(&mut g, path.id) {
        Some(league) => HttpResponse::Ok().json(&*league),
        None => not_found(),
    }
}

#[post("/api/leagues/{id}/players")]
async fn api_add_player(state: AppState, path: Path<LeaguePath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = league.add_player(body.name.trim(), body.level);
    respond(league, result)
}

#[delete("/api/leagues/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<LeaguePlayerPath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = league.remove_player(path.player_id);
    respond(league, result)
}

/// Take a player in or out of the rotation.
#[put("/api/leagues/{id}/players/{player_id}/active")]
async fn api_set_player_active(
    state: AppState,
    path: Path<LeaguePlayerPath>,
    body: Json<SetActiveBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = league.set_player_active(path.player_id, body.active);
    respond(league, result)
}

#[put("/api/leagues/{id}/players/{player_id}/level")]
async fn api_set_player_level(
    state: AppState,
    path: Path<LeaguePlayerPath>,
    body: Json<SetLevelBody>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = league.set_player_level(path.player_id, body.level);
    respond(league, result)
}

#[put("/api/leagues/{id}/courts")]
async fn api_set_courts(state: AppState, path: Path<LeaguePath>, body: Json<SetCourtsBody>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = league.set_courts(body.courts);
    respond(league, result)
}

/// Import players from a CSV body (`name,level[,active]`).
#[post("/api/leagues/{id}/roster")]
async fn api_import_roster(state: AppState, path: Path<LeaguePath>, body: String) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    match import_roster(league, body.as_bytes()) {
        Ok(_) => HttpResponse::Ok().json(&*league),
        Err(e) => bad_request(e),
    }
}

/// Generate the next round for the active players.
#[post("/api/leagues/{id}/rounds")]
async fn api_generate_round(
    state: AppState,
    path: Path<LeaguePath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let options = GeneratorOptions {
        seed: body.and_then(|b| b.seed),
    };
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = generate_round(league, options).map(|r| r.id);
    respond(league, result)
}

/// Discard the latest (unscored) round and generate a replacement.
#[post("/api/leagues/{id}/rounds/regenerate")]
async fn api_regenerate_round(
    state: AppState,
    path: Path<LeaguePath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let options = GeneratorOptions {
        seed: body.and_then(|b| b.seed),
    };
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = regenerate_last_round(league, options).map(|r| r.id);
    respond(league, result)
}

#[put("/api/leagues/{id}/rounds/{round_id}/matches/{match_id}/score")]
async fn api_record_score(state: AppState, path: Path<LeagueMatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = record_score(league, path.round_id, path.match_id, body.games_a, body.games_b);
    respond(league, result)
}

#[delete("/api/leagues/{id}/rounds/{round_id}/matches/{match_id}/score")]
async fn api_clear_score(state: AppState, path: Path<LeagueMatchPath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    let result = clear_score(league, path.round_id, path.match_id);
    respond(league, result)
}

#[get("/api/leagues/{id}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = state.write().await;
    match touch(&mut g, path.id) {
        Some(league) => HttpResponse::Ok().json(league.leaderboard()),
        None => not_found(),
    }
}

#[get("/api/leagues/{id}/leaderboard.csv")]
async fn api_leaderboard_csv(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = state.write().await;
    let Some(league) = touch(&mut g, path.id) else {
        return not_found();
    };
    match leaderboard_csv(&league.leaderboard()) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    // Background task: periodically remove leagues that have been idle for longer than the TTL
    let state_cleanup = state.clone();
    let ttl = config.league_ttl;
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = state_cleanup.write().await;
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < ttl);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive league(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_league)
            .service(api_get_league)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_set_player_active)
            .service(api_set_player_level)
            .service(api_set_courts)
            .service(api_import_roster)
            .service(api_generate_round)
            .service(api_regenerate_round)
            .service(api_record_score)
            .service(api_clear_score)
            .service(api_leaderboard_csv)
            .service(api_leaderboard)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
