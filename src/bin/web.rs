//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set SNAPSHOT_DIR to keep a JSON snapshot per tournament across restarts.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use cricket_tournament_web::export::standings_csv;
use cricket_tournament_web::persistence::{clear_state, load_state, save_state, JsonFileStore};
use cricket_tournament_web::{
    apply, generate_sample_results, is_tournament_complete, logic::lifecycle::match_state, next_match_id,
    playoff_status, team_standings, tournament_winner, ActionOutcome, Command, CricketMatch, MatchState,
    PlayoffFormat, PlayoffStatus, ScoreInput, TossDecision, TournamentError, TournamentPhase, TournamentState,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a hosted tournament.
type TournamentId = Uuid;

/// Per-tournament entry: tournament state + bookkeeping for listing and auto-cleanup.
struct TournamentEntry {
    state: TournamentState,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(state: TournamentState) -> Self {
        Self {
            state,
            created_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }
}

/// All hosted tournaments. Entries are dropped from memory after inactivity; snapshots stay on disk.
struct Registry {
    tournaments: RwLock<HashMap<TournamentId, TournamentEntry>>,
    snapshot_dir: Option<PathBuf>,
}

type AppState = Data<Registry>;

/// Inactivity threshold: tournaments not accessed for this long are dropped from memory.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

impl Registry {
    fn store(&self, id: TournamentId) -> Option<JsonFileStore> {
        self.snapshot_dir
            .as_ref()
            .map(|dir| JsonFileStore::new(dir.join(format!("{}.json", id))))
    }

    fn persist(&self, id: TournamentId, state: &TournamentState) {
        if let Some(store) = self.store(id) {
            save_state(&store, state);
        }
    }

    fn lock(&self) -> Option<RwLockWriteGuard<'_, HashMap<TournamentId, TournamentEntry>>> {
        self.tournaments.write().ok()
    }

    /// Entry for `id`, reloading an evicted tournament from its snapshot.
    fn entry<'a>(
        &self,
        g: &'a mut HashMap<TournamentId, TournamentEntry>,
        id: TournamentId,
    ) -> Option<&'a mut TournamentEntry> {
        if !g.contains_key(&id) {
            let store = self.store(id)?;
            if !store.path().exists() {
                return None;
            }
            log::info!("Reloading tournament {} from {}", id, store.path().display());
            g.insert(id, TournamentEntry::new(load_state(&store)));
        }
        let entry = g.get_mut(&id)?;
        entry.last_activity = Instant::now();
        Some(entry)
    }

    /// Load every snapshot in the snapshot directory (startup).
    fn load_snapshots(&self) {
        let Some(dir) = &self.snapshot_dir else { return };
        let files = match std::fs::read_dir(dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Snapshot directory {} not readable: {}", dir.display(), e);
                return;
            }
        };
        let Some(mut g) = self.lock() else { return };
        for file in files.flatten() {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            else {
                continue;
            };
            g.insert(id, TournamentEntry::new(load_state(&JsonFileStore::new(path))));
        }
        log::info!("Loaded {} tournament snapshot(s) from {}", g.len(), dir.display());
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTournamentBody {
    #[serde(default)]
    max_overs: Option<u32>,
    #[serde(default)]
    max_wickets: Option<u32>,
    #[serde(default)]
    playoff_format: Option<PlayoffFormat>,
    #[serde(default)]
    teams: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TournamentSummary {
    id: TournamentId,
    created_at: DateTime<Utc>,
    phase: TournamentPhase,
    teams: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTournament<'a> {
    id: TournamentId,
    #[serde(flatten)]
    state: &'a TournamentState,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsBody {
    max_overs: u32,
    max_wickets: u32,
}

#[derive(Deserialize)]
struct FormatBody {
    format: PlayoffFormat,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TossBody {
    toss_winner: String,
    decision: TossDecision,
}

#[derive(Deserialize)]
struct InningsBody {
    team: String,
    #[serde(flatten)]
    score: ScoreInput,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateBody {
    team1_score: ScoreInput,
    team2_score: ScoreInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchView<'a> {
    #[serde(flatten)]
    game: &'a CricketMatch,
    state: MatchState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    #[serde(flatten)]
    status: PlayoffStatus,
    is_complete: bool,
    winner: Option<String>,
    next_match_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteMatchResponse<'a> {
    next_match_id: Option<String>,
    tournament: &'a TournamentState,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and team name.
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    name: String,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/RR-001)
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn rejected(e: &TournamentError) -> HttpResponse {
    let outcome = ActionOutcome::from_error(e);
    if e.is_precondition() {
        HttpResponse::Ok().json(outcome)
    } else {
        HttpResponse::BadRequest().json(outcome)
    }
}

/// Apply one command to a tournament and answer with the new state.
fn run_command(registry: &Registry, id: TournamentId, command: Command) -> HttpResponse {
    let Some(mut g) = registry.lock() else { return lock_error() };
    let Some(entry) = registry.entry(&mut g, id) else { return not_found() };
    match apply(&entry.state, command) {
        Ok(next) => {
            entry.state = next;
            registry.persist(id, &entry.state);
            HttpResponse::Ok().json(&entry.state)
        }
        Err(e) => rejected(&e),
    }
}

/// Read-only access to a tournament.
fn with_tournament(registry: &Registry, id: TournamentId, f: impl FnOnce(&TournamentState) -> HttpResponse) -> HttpResponse {
    let Some(mut g) = registry.lock() else { return lock_error() };
    match registry.entry(&mut g, id) {
        Some(entry) => f(&entry.state),
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cricket-tournament-web",
    })
}

/// Create a new tournament, optionally with settings and teams (returns it with its id).
#[post("/api/tournaments")]
async fn api_create_tournament(registry: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let mut state = TournamentState::new();
    if let Some(body) = body {
        let body = body.into_inner();
        let mut commands = Vec::new();
        if body.max_overs.is_some() || body.max_wickets.is_some() {
            commands.push(Command::UpdateSettings {
                max_overs: body.max_overs.unwrap_or(state.max_overs),
                max_wickets: body.max_wickets.unwrap_or(state.max_wickets),
            });
        }
        if let Some(format) = body.playoff_format {
            commands.push(Command::SetPlayoffFormat { format });
        }
        commands.extend(body.teams.into_iter().map(|name| Command::AddTeam { name }));
        for command in commands {
            state = match apply(&state, command) {
                Ok(next) => next,
                Err(e) => return rejected(&e),
            };
        }
    }

    let id = Uuid::new_v4();
    let Some(mut g) = registry.lock() else { return lock_error() };
    registry.persist(id, &state);
    let entry = g.entry(id).or_insert(TournamentEntry::new(state));
    log::info!("Created tournament {}", id);
    HttpResponse::Ok().json(CreatedTournament { id, state: &entry.state })
}

/// List hosted tournaments.
#[get("/api/tournaments")]
async fn api_list_tournaments(registry: AppState) -> HttpResponse {
    let Some(g) = registry.lock() else { return lock_error() };
    let mut list: Vec<TournamentSummary> = g
        .iter()
        .map(|(id, entry)| TournamentSummary {
            id: *id,
            created_at: entry.created_at,
            phase: entry.state.phase,
            teams: entry.state.teams.len(),
        })
        .collect();
    list.sort_by_key(|t| t.created_at);
    HttpResponse::Ok().json(list)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&registry, path.id, |t| HttpResponse::Ok().json(t))
}

/// Delete a tournament and its snapshot.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Some(mut g) = registry.lock() else { return lock_error() };
    let removed = g.remove(&path.id).is_some();
    let cleared = registry.store(path.id).is_some_and(|s| s.path().exists() && clear_state(&s));
    if removed || cleared {
        HttpResponse::Ok().json(ActionOutcome::ok())
    } else {
        not_found()
    }
}

/// Apply any command (see `Command` for the JSON shape).
#[post("/api/tournaments/{id}/commands")]
async fn api_command(registry: AppState, path: Path<TournamentPath>, body: Json<Command>) -> HttpResponse {
    run_command(&registry, path.id, body.into_inner())
}

/// Add a team (Setup only).
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(registry: AppState, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    let name = body.into_inner().name;
    run_command(&registry, path.id, Command::AddTeam { name })
}

/// Remove a team (Setup only).
#[delete("/api/tournaments/{id}/teams/{name}")]
async fn api_remove_team(registry: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let path = path.into_inner();
    run_command(&registry, path.id, Command::RemoveTeam { name: path.name })
}

/// Overs and wickets per innings (Setup only).
#[put("/api/tournaments/{id}/settings")]
async fn api_set_settings(registry: AppState, path: Path<TournamentPath>, body: Json<SettingsBody>) -> HttpResponse {
    let command = Command::UpdateSettings {
        max_overs: body.max_overs,
        max_wickets: body.max_wickets,
    };
    run_command(&registry, path.id, command)
}

/// Playoff format (Setup only).
#[put("/api/tournaments/{id}/format")]
async fn api_set_format(registry: AppState, path: Path<TournamentPath>, body: Json<FormatBody>) -> HttpResponse {
    run_command(&registry, path.id, Command::SetPlayoffFormat { format: body.format })
}

/// Generate the round robin and the playoff bracket.
#[post("/api/tournaments/{id}/generate")]
async fn api_generate(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    run_command(&registry, path.id, Command::GenerateMatches)
}

/// All matches with their derived lifecycle state.
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&registry, path.id, |t| {
        let views: Vec<MatchView> = t
            .matches
            .iter()
            .map(|m| MatchView {
                game: m,
                state: match_state(m),
            })
            .collect();
        HttpResponse::Ok().json(views)
    })
}

#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(registry: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let path = path.into_inner();
    run_command(&registry, path.id, Command::StartMatch { match_id: path.match_id })
}

#[put("/api/tournaments/{id}/matches/{match_id}/toss")]
async fn api_set_toss(registry: AppState, path: Path<TournamentMatchPath>, body: Json<TossBody>) -> HttpResponse {
    let path = path.into_inner();
    let body = body.into_inner();
    let command = Command::SetToss {
        match_id: path.match_id,
        toss_winner: body.toss_winner,
        decision: body.decision,
    };
    run_command(&registry, path.id, command)
}

#[post("/api/tournaments/{id}/matches/{match_id}/second-innings")]
async fn api_start_second_innings(registry: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let path = path.into_inner();
    run_command(&registry, path.id, Command::StartSecondInnings { match_id: path.match_id })
}

#[put("/api/tournaments/{id}/matches/{match_id}/innings")]
async fn api_record_innings(registry: AppState, path: Path<TournamentMatchPath>, body: Json<InningsBody>) -> HttpResponse {
    let path = path.into_inner();
    let body = body.into_inner();
    let command = Command::RecordInnings {
        match_id: path.match_id,
        team: body.team,
        score: body.score,
    };
    run_command(&registry, path.id, command)
}

/// Finalize a match; answers with the next playable match id as well.
#[post("/api/tournaments/{id}/matches/{match_id}/complete")]
async fn api_complete_match(registry: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let path = path.into_inner();
    let Some(mut g) = registry.lock() else { return lock_error() };
    let Some(entry) = registry.entry(&mut g, path.id) else { return not_found() };
    match cricket_tournament_web::complete_match(&entry.state, &path.match_id) {
        Ok((next, next_match_id)) => {
            entry.state = next;
            registry.persist(path.id, &entry.state);
            HttpResponse::Ok().json(CompleteMatchResponse {
                next_match_id,
                tournament: &entry.state,
            })
        }
        Err(e) => rejected(&e),
    }
}

/// Enter both scores and finalize in one step.
#[post("/api/tournaments/{id}/matches/{match_id}/simulate")]
async fn api_simulate_match(registry: AppState, path: Path<TournamentMatchPath>, body: Json<SimulateBody>) -> HttpResponse {
    let path = path.into_inner();
    let body = body.into_inner();
    let command = Command::SimulateMatchResult {
        match_id: path.match_id,
        team1_score: body.team1_score,
        team2_score: body.team2_score,
    };
    run_command(&registry, path.id, command)
}

#[post("/api/tournaments/{id}/matches/{match_id}/cancel")]
async fn api_cancel_match(registry: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let path = path.into_inner();
    run_command(&registry, path.id, Command::CancelMatch { match_id: path.match_id })
}

/// Random results for every pending match, bracket included.
#[post("/api/tournaments/{id}/simulate-all")]
async fn api_simulate_all(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Some(mut g) = registry.lock() else { return lock_error() };
    let Some(entry) = registry.entry(&mut g, path.id) else { return not_found() };
    match generate_sample_results(&entry.state, &mut rand::thread_rng()) {
        Ok(next) => {
            entry.state = next;
            registry.persist(path.id, &entry.state);
            HttpResponse::Ok().json(&entry.state)
        }
        Err(e) => rejected(&e),
    }
}

#[post("/api/tournaments/{id}/playoffs/resolve")]
async fn api_resolve_playoffs(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    run_command(&registry, path.id, Command::ResolvePlayoffs)
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&registry, path.id, |t| HttpResponse::Ok().json(team_standings(t)))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&registry, path.id, |t| match standings_csv(&team_standings(t)) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("export error")
        }
    })
}

#[get("/api/tournaments/{id}/status")]
async fn api_status(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&registry, path.id, |t| {
        HttpResponse::Ok().json(StatusResponse {
            status: playoff_status(t),
            is_complete: is_tournament_complete(t),
            winner: tournament_winner(t),
            next_match_id: next_match_id(t),
        })
    })
}

/// Back to Setup with the same teams and settings.
#[post("/api/tournaments/{id}/restart")]
async fn api_restart(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    run_command(&registry, path.id, Command::Restart)
}

/// Back to an empty tournament.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(registry: AppState, path: Path<TournamentPath>) -> HttpResponse {
    run_command(&registry, path.id, Command::Reset)
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let snapshot_dir = std::env::var("SNAPSHOT_DIR").ok().filter(|d| !d.is_empty()).map(PathBuf::from);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let registry = Data::new(Registry {
        tournaments: RwLock::new(HashMap::new()),
        snapshot_dir,
    });
    registry.load_snapshots();

    // Background task: every 30 minutes, drop tournaments inactive for 12+ hours
    let registry_cleanup = registry.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let Some(mut g) = registry_cleanup.lock() else { continue };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(registry.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_command)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_set_settings)
            .service(api_set_format)
            .service(api_generate)
            .service(api_list_matches)
            .service(api_start_match)
            .service(api_set_toss)
            .service(api_start_second_innings)
            .service(api_record_innings)
            .service(api_complete_match)
            .service(api_simulate_match)
            .service(api_cancel_match)
            .service(api_simulate_all)
            .service(api_resolve_playoffs)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_status)
            .service(api_restart)
            .service(api_reset)
    })
    .bind(bind)?
    .run()
    .await
}
