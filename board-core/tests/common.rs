use std::sync::Mutex;

use async_trait::async_trait;
use board_core::{PersistenceError, ScoreGateway, UpsertScore};
use board_types::{DailyScore, Player, PlayerId, Team};
use chrono::NaiveDate;
use uuid::Uuid;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// Creates a test player with the given first name and saved boards
pub fn create_test_player(name: &str, scores: Vec<DailyScore>) -> Player {
    Player {
        id: Uuid::new_v4(),
        email: format!("{}@test.com", name.to_lowercase()),
        first_name: Some(name.to_string()),
        last_name: None,
        scores,
    }
}

pub fn create_test_team(players: Vec<Player>, play_weekends: bool) -> Team {
    Team {
        id: 1,
        name: "Test Team".to_string(),
        play_weekends,
        players,
    }
}

pub fn board(player_id: PlayerId, date: NaiveDate, answer: &str, guesses: &[&str]) -> DailyScore {
    DailyScore {
        id: 0,
        player_id,
        date,
        answer: answer.to_string(),
        guesses: guesses.iter().map(|g| g.to_string()).collect(),
    }
}

/// In-memory gateway that records every request it receives
pub struct RecordingGateway {
    pub requests: Mutex<Vec<UpsertScore>>,
    next_id: Mutex<i32>,
    fail: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<UpsertScore> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreGateway for RecordingGateway {
    async fn upsert_daily_score(
        &self,
        request: UpsertScore,
    ) -> Result<DailyScore, PersistenceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(PersistenceError::Storage("database unavailable".to_string()));
        }

        let id = match request.score_id {
            Some(id) => id,
            None => {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                *next
            }
        };

        Ok(DailyScore {
            id,
            player_id: request.player_id,
            date: request.date,
            answer: request.answer,
            guesses: request.guesses,
        })
    }
}
