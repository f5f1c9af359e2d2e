use std::sync::Arc;

use reqwest::Url;
use tracing::{error, warn};
use warp::http::{StatusCode, Uri, header};
use warp::{Filter, Reply};

use crate::auth::{AuthCallback, AuthService, CallbackRequest, ERROR_PATH, token::session_token};
use board_core::{
    FAILED_MESSAGE, MonthKey, SAVED_MESSAGE, ScoreGateway, ScoringEngine, UpsertScore,
    check_board, normalize_word, played_guesses,
};
use board_persistence::repositories::{PlayerRepository, ScoreRepository, TeamRepository};
use board_types::{AuthIdentity, RedirectTarget, UpsertBoardRequest, UpsertBoardResponse};

pub mod analytics;
pub mod auth;
pub mod config;

/// Cookie carrying the PKCE verifier set by the sign-in page
pub const CODE_VERIFIER_COOKIE: &str = "sb-code-verifier";
/// Cookie carrying the session token after a successful callback
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

const MAX_BODY_BYTES: u64 = 16 * 1024;
/// Months offered by the team month picker, current month included
pub const RECENT_MONTHS: usize = 12;

pub fn create_routes(
    site_url: Url,
    auth_callback: Arc<AuthCallback>,
    auth_service: Arc<AuthService>,
    player_repository: Arc<PlayerRepository>,
    score_repository: Arc<ScoreRepository>,
    team_repository: Arc<TeamRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let site_url = Arc::new(site_url);
    let site_url_filter = warp::any().map(move || site_url.clone());
    let callback_filter = warp::any().map(move || auth_callback.clone());
    let auth_filter = warp::any().map(move || auth_service.clone());
    let player_repository_filter = warp::any().map(move || player_repository.clone());
    let score_repository_filter = warp::any().map(move || score_repository.clone());
    let team_repository_filter = warp::any().map(move || team_repository.clone());

    let session = warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional::<String>(ACCESS_TOKEN_COOKIE));

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let auth_callback = warp::path!("auth" / "callback")
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>())
        .and(warp::cookie::optional::<String>(CODE_VERIFIER_COOKIE))
        .and(callback_filter)
        .and(site_url_filter)
        .and_then(handle_auth_callback);

    let my_scores = warp::path!("me" / "scores")
        .and(warp::get())
        .and(session.clone())
        .and(auth_filter.clone())
        .and(score_repository_filter.clone())
        .and_then(handle_my_scores_request);

    let upsert_board = warp::path!("scores")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<UpsertBoardRequest>())
        .and(session.clone())
        .and(auth_filter.clone())
        .and(player_repository_filter)
        .and(score_repository_filter)
        .and_then(handle_upsert_board_request);

    let team_months = warp::path!("teams" / i32 / "months")
        .and(warp::get())
        .and(session.clone())
        .and(auth_filter.clone())
        .and(team_repository_filter.clone())
        .and_then(handle_team_months_request);

    let team_month = warp::path!("teams" / i32 / "scores" / String)
        .and(warp::get())
        .and(session)
        .and(auth_filter)
        .and(team_repository_filter)
        .and_then(handle_team_month_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(auth_callback)
        .or(my_scores)
        .or(upsert_board)
        .or(team_months)
        .or(team_month)
        .with(cors)
        .with(warp::log("wordle_teams"))
}

fn error_reply(message: &str, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
}

async fn authenticate(
    authorization: Option<String>,
    cookie: Option<String>,
    auth_service: &AuthService,
) -> Result<AuthIdentity, warp::reply::WithStatus<warp::reply::Json>> {
    let Some(token) = session_token(authorization, cookie) else {
        return Err(error_reply(
            "Authentication required",
            StatusCode::UNAUTHORIZED,
        ));
    };

    auth_service.validate_token(&token).await.map_err(|e| {
        warn!("Rejected session token: {}", e);
        error_reply("Invalid authentication token", StatusCode::UNAUTHORIZED)
    })
}

/// Absolute redirect URL on the web app for a callback outcome
pub fn redirect_location(site_url: &Url, target: &RedirectTarget) -> Url {
    let mut location = site_url.clone();
    location.set_path(&target.path);
    location.set_query(None);
    if !target.query.is_empty() {
        let mut pairs = location.query_pairs_mut();
        for (key, value) in &target.query {
            pairs.append_pair(key, value);
        }
    }
    location
}

fn session_cookie(access_token: &str, max_age: u64, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        ACCESS_TOKEN_COOKIE,
        access_token,
        max_age,
        if secure { "; Secure" } else { "" }
    )
}

async fn handle_auth_callback(
    query: Vec<(String, String)>,
    code_verifier: Option<String>,
    auth_callback: Arc<AuthCallback>,
    site_url: Arc<Url>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let request = CallbackRequest::new(query).with_code_verifier(code_verifier);
    let outcome = auth_callback.handle(&request).await;

    let location = redirect_location(&site_url, &outcome.redirect);
    let uri: Uri = match location.as_str().parse() {
        Ok(uri) => uri,
        Err(e) => {
            error!("Unusable redirect location {}: {}", location, e);
            Uri::from_static(ERROR_PATH)
        }
    };
    let redirect = warp::redirect::see_other(uri);

    match outcome.session {
        Some(session) => {
            let cookie = session_cookie(
                &session.access_token,
                session.expires_in.unwrap_or(3600),
                site_url.scheme() == "https",
            );
            Ok(warp::reply::with_header(redirect, header::SET_COOKIE, cookie).into_response())
        }
        None => Ok(redirect.into_response()),
    }
}

async fn handle_my_scores_request(
    authorization: Option<String>,
    cookie: Option<String>,
    auth_service: Arc<AuthService>,
    score_repository: Arc<ScoreRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity = match authenticate(authorization, cookie, &auth_service).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };

    match score_repository.find_by_player(identity.id).await {
        Ok(scores) => Ok(warp::reply::with_status(
            warp::reply::json(&scores),
            StatusCode::OK,
        )),
        Err(err) => {
            error!("Failed to fetch scores for {}: {}", identity.id, err);
            Ok(error_reply(
                "Failed to fetch scores",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

fn failed_upsert() -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&UpsertBoardResponse {
            success: false,
            message: FAILED_MESSAGE.to_string(),
            daily_score: None,
        }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

async fn handle_upsert_board_request(
    request: UpsertBoardRequest,
    authorization: Option<String>,
    cookie: Option<String>,
    auth_service: Arc<AuthService>,
    player_repository: Arc<PlayerRepository>,
    score_repository: Arc<ScoreRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity = match authenticate(authorization, cookie, &auth_service).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };

    let answer = normalize_word(&request.answer);
    let guesses: Vec<String> = request.guesses.iter().map(|g| normalize_word(g)).collect();
    if let Err(issue) = check_board(&answer, &guesses) {
        return Ok(error_reply(
            &format!("Invalid board: {}", issue),
            StatusCode::BAD_REQUEST,
        ));
    }

    if let Err(err) = player_repository.ensure_player(&identity).await {
        error!("Failed to ensure player {}: {}", identity.id, err);
        return Ok(failed_upsert());
    }

    let upsert = UpsertScore {
        score_id: request.existing_score_id(),
        player_id: identity.id,
        date: request.date,
        answer,
        guesses: played_guesses(&guesses),
    };

    match score_repository.upsert_daily_score(upsert).await {
        Ok(score) => Ok(warp::reply::with_status(
            warp::reply::json(&UpsertBoardResponse {
                success: true,
                message: SAVED_MESSAGE.to_string(),
                daily_score: Some(score),
            }),
            StatusCode::OK,
        )),
        Err(err) => {
            error!("Failed to save board for {}: {}", identity.id, err);
            Ok(failed_upsert())
        }
    }
}

async fn handle_team_months_request(
    team_id: i32,
    authorization: Option<String>,
    cookie: Option<String>,
    auth_service: Arc<AuthService>,
    team_repository: Arc<TeamRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity = match authenticate(authorization, cookie, &auth_service).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };

    match team_repository.is_member(team_id, identity.id).await {
        Ok(true) => {}
        Ok(false) => return Ok(error_reply("Not a member of this team", StatusCode::FORBIDDEN)),
        Err(err) => {
            error!("Failed to check membership of team {}: {}", team_id, err);
            return Ok(error_reply(
                "Failed to load team months",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    }

    let months: Vec<String> = MonthKey::of(chrono::Utc::now().date_naive())
        .recent(RECENT_MONTHS)
        .iter()
        .map(MonthKey::to_string)
        .collect();
    Ok(warp::reply::with_status(
        warp::reply::json(&months),
        StatusCode::OK,
    ))
}

async fn handle_team_month_request(
    team_id: i32,
    month: String,
    authorization: Option<String>,
    cookie: Option<String>,
    auth_service: Arc<AuthService>,
    team_repository: Arc<TeamRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let month = match MonthKey::parse(&month) {
        Ok(month) => month,
        Err(e) => return Ok(error_reply(&e.to_string(), StatusCode::BAD_REQUEST)),
    };

    let identity = match authenticate(authorization, cookie, &auth_service).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };

    let team = match team_repository.find_team_month(team_id, month).await {
        Ok(Some(team)) => team,
        Ok(None) => return Ok(error_reply("Team not found", StatusCode::NOT_FOUND)),
        Err(err) => {
            error!("Failed to load team {} for {}: {}", team_id, month, err);
            return Ok(error_reply(
                "Failed to load team scores",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    // Players can only view their own teams
    if team.player(identity.id).is_none() {
        return Ok(error_reply("Not a member of this team", StatusCode::FORBIDDEN));
    }

    let summary = ScoringEngine::summarize_team_month(&team, month);
    Ok(warp::reply::with_status(
        warp::reply::json(&summary),
        StatusCode::OK,
    ))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::analytics::NoopAnalytics;
    use crate::auth::DevIdentityProvider;
    use board_persistence::repositories::InvitationRepository;
    use board_types::{DailyScore, TeamMonthSummary};
    use migration::{Migrator, MigratorTrait};
    use serde_json::json;
    use uuid::Uuid;

    struct TestRepositories {
        players: Arc<PlayerRepository>,
        teams: Arc<TeamRepository>,
        invitations: Arc<InvitationRepository>,
    }

    async fn create_dev_test_app() -> (
        impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone,
        TestRepositories,
    ) {
        // Create in-memory database for tests
        let db = board_persistence::connection::connect_to_memory_database()
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();

        let players = Arc::new(PlayerRepository::new(db.clone()));
        let scores = Arc::new(ScoreRepository::new(db.clone()));
        let teams = Arc::new(TeamRepository::new(db.clone()));
        let invitations = Arc::new(InvitationRepository::new(db));

        let auth_callback = Arc::new(AuthCallback::new(
            Arc::new(DevIdentityProvider),
            invitations.clone(),
            Arc::new(NoopAnalytics),
        ));

        let routes = create_routes(
            Url::parse("http://localhost:3000").unwrap(),
            auth_callback,
            Arc::new(AuthService::new_dev_mode()),
            players.clone(),
            scores,
            teams.clone(),
        );

        (
            routes,
            TestRepositories {
                players,
                teams,
                invitations,
            },
        )
    }

    fn bearer(player_id: Uuid, email: &str) -> String {
        format!("Bearer {}:{}:Test Player", player_id, email)
    }

    fn location(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Url {
        let raw = response
            .headers()
            .get("location")
            .expect("redirect has a location")
            .to_str()
            .unwrap();
        Url::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_callback_code_redirects_to_landing_page() {
        let (app, _) = create_dev_test_app().await;
        let player_id = Uuid::new_v4();

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/auth/callback?code={}:ana@example.com:Ana", player_id))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 303);
        assert_eq!(location(&response).as_str(), "http://localhost:3000/me");

        let cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("sb-access-token="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_callback_honours_local_next_and_strips_credentials() {
        let (app, _) = create_dev_test_app().await;
        let player_id = Uuid::new_v4();

        let response = warp::test::request()
            .method("GET")
            .path(&format!(
                "/auth/callback?code={}:ana@example.com:Ana&next=/teams/3",
                player_id
            ))
            .reply(&app)
            .await;

        let url = location(&response);
        assert_eq!(url.path(), "/teams/3");
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["next".to_string()]);
    }

    #[tokio::test]
    async fn test_callback_without_credentials_goes_to_error_page() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/auth/callback?type=signup")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 303);
        assert_eq!(location(&response).path(), ERROR_PATH);
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_invited_callback_joins_team() {
        let (app, repos) = create_dev_test_app().await;
        let team = repos.teams.create_team("Crossword Crew", false).await.unwrap();
        repos
            .invitations
            .create_invitation(team.id, "ben@example.com")
            .await
            .unwrap();
        let player_id = Uuid::new_v4();

        let response = warp::test::request()
            .method("GET")
            .path(&format!(
                "/auth/callback?token_hash={}:ben@example.com:Ben&type=invite",
                player_id
            ))
            .reply(&app)
            .await;

        assert_eq!(location(&response).path(), "/complete-profile");
        assert!(repos.teams.is_member(team.id, player_id).await.unwrap());
        let player = repos.players.find_by_id(player_id).await.unwrap().unwrap();
        assert_eq!(player.first_name.as_deref(), Some("Ben"));
    }

    #[tokio::test]
    async fn test_invited_callback_without_invitation_fails() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path(&format!(
                "/auth/callback?token_hash={}:ben@example.com:Ben&type=invite",
                Uuid::new_v4()
            ))
            .reply(&app)
            .await;

        assert_eq!(location(&response).path(), ERROR_PATH);
    }

    #[tokio::test]
    async fn test_upsert_board_requires_authentication() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .json(&json!({
                "date": "2024-03-04",
                "answer": "crane",
                "guesses": ["crane"]
            }))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_upsert_board_creates_then_updates() {
        let (app, repos) = create_dev_test_app().await;
        let player_id = Uuid::new_v4();
        let token = bearer(player_id, "ana@example.com");

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", token.as_str())
            .json(&json!({
                "score_id": -1,
                "date": "2024-03-04",
                "answer": "CRANE",
                "guesses": ["spade", "crane", "", "", "", ""]
            }))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let body: UpsertBoardResponse = serde_json::from_slice(response.body()).unwrap();
        assert!(body.success);
        assert_eq!(body.message, SAVED_MESSAGE);
        let created = body.daily_score.unwrap();
        assert_eq!(created.answer, "crane");
        assert_eq!(created.guesses, vec!["spade", "crane"]);

        // lazily created on first save
        assert!(repos.players.find_by_id(player_id).await.unwrap().is_some());

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", token.as_str())
            .json(&json!({
                "score_id": created.id,
                "date": "2024-03-04",
                "answer": "crane",
                "guesses": ["spade", "slate", "crane", "", "", ""]
            }))
            .reply(&app)
            .await;

        let body: UpsertBoardResponse = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.daily_score.unwrap().id, created.id);

        let response = warp::test::request()
            .method("GET")
            .path("/me/scores")
            .header("authorization", token.as_str())
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let scores: Vec<DailyScore> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].guesses.len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_invalid_board_rejected() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", bearer(Uuid::new_v4(), "ana@example.com").as_str())
            .json(&json!({
                "date": "2024-03-04",
                "answer": "crane",
                "guesses": ["spad", "", "", "", "", ""]
            }))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_update_of_foreign_board_fails() {
        let (app, _) = create_dev_test_app().await;
        let board = json!({
            "date": "2024-03-04",
            "answer": "crane",
            "guesses": ["crane"]
        });

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", bearer(Uuid::new_v4(), "ana@example.com").as_str())
            .json(&board)
            .reply(&app)
            .await;
        let body: UpsertBoardResponse = serde_json::from_slice(response.body()).unwrap();
        let score_id = body.daily_score.unwrap().id;

        let response = warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", bearer(Uuid::new_v4(), "ben@example.com").as_str())
            .json(&json!({
                "score_id": score_id,
                "date": "2024-03-04",
                "answer": "crane",
                "guesses": ["slate", "crane"]
            }))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 500);
        let body: UpsertBoardResponse = serde_json::from_slice(response.body()).unwrap();
        assert!(!body.success);
        assert_eq!(body.message, FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_team_month_summary_access() {
        let (app, repos) = create_dev_test_app().await;
        let ana = Uuid::new_v4();
        let ana_token = bearer(ana, "ana@example.com");

        warp::test::request()
            .method("POST")
            .path("/scores")
            .header("authorization", ana_token.as_str())
            .json(&json!({
                "date": "2024-03-04",
                "answer": "crane",
                "guesses": ["spade", "crane"]
            }))
            .reply(&app)
            .await;

        let team = repos.teams.create_team("Crossword Crew", false).await.unwrap();
        repos.teams.add_member(team.id, ana).await.unwrap();

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/scores/202403", team.id))
            .header("authorization", ana_token.as_str())
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let summary: TeamMonthSummary = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(summary.month, "202403");
        assert_eq!(summary.players.len(), 1);
        assert_eq!(summary.players[0].boards_played, 1);
        assert_eq!(summary.players[0].total_score, 2);

        // outsiders
        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/scores/202403", team.id))
            .header("authorization", bearer(Uuid::new_v4(), "eve@example.com").as_str())
            .reply(&app)
            .await;
        assert_eq!(response.status(), 403);

        let response = warp::test::request()
            .method("GET")
            .path("/teams/999/scores/202403")
            .header("authorization", ana_token.as_str())
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/scores/2024-03", team.id))
            .header("authorization", ana_token.as_str())
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_team_months_lists_recent_months_for_members() {
        let (app, repos) = create_dev_test_app().await;
        let ana = Uuid::new_v4();
        let ana_token = bearer(ana, "ana@example.com");
        let team = repos.teams.create_team("Crossword Crew", true).await.unwrap();
        repos.players.create_player(ana, "ana@example.com", None, None).await.unwrap();
        repos.teams.add_member(team.id, ana).await.unwrap();

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/months", team.id))
            .header("authorization", ana_token.as_str())
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let months: Vec<String> = serde_json::from_slice(response.body()).unwrap();
        let current = MonthKey::of(chrono::Utc::now().date_naive());
        assert_eq!(months.len(), RECENT_MONTHS);
        assert_eq!(months[0], current.to_string());
        assert_eq!(months[1], current.previous().to_string());
        // every option is a valid team month route key
        assert!(months.iter().all(|key| MonthKey::parse(key).is_ok()));

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/months", team.id))
            .header("authorization", bearer(Uuid::new_v4(), "eve@example.com").as_str())
            .reply(&app)
            .await;
        assert_eq!(response.status(), 403);

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/teams/{}/months", team.id))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_callback_session_cookie_is_well_formed() {
        let (app, _) = create_dev_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path(&format!(
                "/auth/callback?code={}:ana@example.com:Ana%20Maria%20Lopez",
                Uuid::new_v4()
            ))
            .reply(&app)
            .await;

        let cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap();
        let (pair, _attributes) = cookie.split_once(';').unwrap();
        let value = pair.strip_prefix("sb-access-token=").unwrap();
        assert!(!value.is_empty());
        assert!(!value.contains(' '));

        // the stored value authenticates API requests on its own
        let response = warp::test::request()
            .method("GET")
            .path("/me/scores")
            .header("cookie", format!("sb-access-token={}", value).as_str())
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn test_redirect_location_replaces_path_and_query() {
        let site = Url::parse("https://wordleteams.example/?stale=1").unwrap();
        let target = RedirectTarget {
            path: "/me".to_string(),
            query: vec![("next".to_string(), "/me".to_string())],
        };

        let url = redirect_location(&site, &target);
        assert_eq!(url.as_str(), "https://wordleteams.example/me?next=%2Fme");
    }
}
