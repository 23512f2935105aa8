//! REST API over the contest store. Every handler returns the affected contest (or a view
//! of it) as JSON; errors become `{ "error": "..." }` with a matching status code.

use crate::logic::{
    generate_draw, import_teams_csv, report_result, Qualification, Round1Outcome,
};
use crate::models::{
    Contest, ContestError, ContestId, GameMode, MatchId, PlayerId, TeamId, TeamType,
};
use crate::store::ContestStore;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};

type AppState = Data<ContestStore>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateContestBody {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    team_type: TeamType,
    #[serde(default)]
    game_mode: GameMode,
}

#[derive(Deserialize)]
struct AddTeamBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    club: Option<String>,
    players: Vec<String>,
}

#[derive(Deserialize)]
struct AddMeleePlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct ReportResultBody {
    winner_team_id: TeamId,
}

#[derive(Serialize)]
struct QualificationView {
    round_1: Option<Round1Outcome>,
    qualification: Option<Qualification>,
}

/// Path segment: contest id (e.g. /api/contests/{id})
#[derive(Deserialize)]
struct ContestPath {
    id: ContestId,
}

#[derive(Deserialize)]
struct ContestTeamPath {
    id: ContestId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct ContestPlayerPath {
    id: ContestId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct ContestMatchPath {
    id: ContestId,
    match_id: MatchId,
}

fn error_response(e: &ContestError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ContestError::ContestNotFound
        | ContestError::MatchNotFound
        | ContestError::TeamNotFound(_)
        | ContestError::PlayerNotFound(_) => HttpResponse::NotFound().json(body),
        ContestError::AlreadyFinished => HttpResponse::Conflict().json(body),
        ContestError::StructureInconsistency { .. }
        | ContestError::NoOpenSlot { .. }
        | ContestError::LockPoisoned => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, ContestError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "petanque-contest-web",
    })
}

#[get("/api/contests")]
async fn api_list_contests(state: AppState) -> HttpResponse {
    respond(state.list())
}

/// Create a new contest in Draft (returns it with id; the client keeps the id).
#[post("/api/contests")]
async fn api_create_contest(state: AppState, body: Json<CreateContestBody>) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return error_response(&ContestError::EmptyName);
    }
    let mut contest = Contest::new(name, body.team_type, body.game_mode);
    contest.location = body
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from);
    match state.insert(contest) {
        Ok(c) => HttpResponse::Created().json(c),
        Err(e) => error_response(&e),
    }
}

#[get("/api/contests/{id}")]
async fn api_get_contest(state: AppState, path: Path<ContestPath>) -> HttpResponse {
    respond(state.get(path.id))
}

/// Delete a contest and everything in it.
#[delete("/api/contests/{id}")]
async fn api_delete_contest(state: AppState, path: Path<ContestPath>) -> HttpResponse {
    match state.remove(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Register a formed team (Draft only).
#[post("/api/contests/{id}/teams")]
async fn api_add_team(
    state: AppState,
    path: Path<ContestPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    let body = body.into_inner();
    respond(state.transact(path.id, |c| {
        c.add_team(body.name, body.club, body.players)?;
        Ok(c.clone())
    }))
}

#[delete("/api/contests/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<ContestTeamPath>) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        c.remove_team(path.team_id)?;
        Ok(c.clone())
    }))
}

/// Bulk registration: CSV body, one team per line.
#[post("/api/contests/{id}/teams/import")]
async fn api_import_teams(state: AppState, path: Path<ContestPath>, body: String) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        import_teams_csv(c, &body)?;
        Ok(c.clone())
    }))
}

#[post("/api/contests/{id}/melee-players")]
async fn api_add_melee_player(
    state: AppState,
    path: Path<ContestPath>,
    body: Json<AddMeleePlayerBody>,
) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        c.add_melee_player(body.name.as_str())?;
        Ok(c.clone())
    }))
}

#[delete("/api/contests/{id}/melee-players/{player_id}")]
async fn api_remove_melee_player(state: AppState, path: Path<ContestPlayerPath>) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        c.remove_melee_player(path.player_id)?;
        Ok(c.clone())
    }))
}

/// Generate round 1 and the empty round 2 / bracket structures.
#[post("/api/contests/{id}/draw")]
async fn api_generate_draw(state: AppState, path: Path<ContestPath>) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        generate_draw(c, &mut rand::thread_rng())?;
        Ok(c.clone())
    }))
}

/// Report the winner of any qualification or bracket match.
#[put("/api/contests/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<ContestMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    respond(state.transact(path.id, |c| {
        report_result(c, path.match_id, body.winner_team_id, &mut rand::thread_rng())?;
        Ok(c.clone())
    }))
}

#[get("/api/contests/{id}/qualification")]
async fn api_qualification(state: AppState, path: Path<ContestPath>) -> HttpResponse {
    respond(state.get(path.id).map(|c| QualificationView {
        round_1: c.round_1_outcome(),
        qualification: c.qualification(),
    }))
}

/// Register every route on an actix app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_contests)
        .service(api_create_contest)
        .service(api_get_contest)
        .service(api_delete_contest)
        .service(api_add_team)
        .service(api_remove_team)
        .service(api_import_teams)
        .service(api_add_melee_player)
        .service(api_remove_melee_player)
        .service(api_generate_draw)
        .service(api_report_result)
        .service(api_qualification);
}
