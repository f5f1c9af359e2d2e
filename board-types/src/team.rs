use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DailyScore, PlayerId, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub scores: Vec<DailyScore>,
}

impl Player {
    /// Name shown on score tables, falling back to the email address
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }

    pub fn score_on(&self, date: NaiveDate) -> Option<&DailyScore> {
        self.scores.iter().find(|score| score.date == date)
    }

    /// Replace the score with the same id, or append it when it is new
    pub fn upsert_score(&mut self, score: DailyScore) {
        match self.scores.iter_mut().find(|existing| existing.id == score.id) {
            Some(existing) => *existing = score,
            None => self.scores.push(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub play_weekends: bool,
    pub players: Vec<Player>,
}

impl Team {
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    /// Record a saved score against one of the team's players.
    /// Returns false when the player is not on this team.
    pub fn update_player_score(&mut self, player_id: PlayerId, score: DailyScore) -> bool {
        match self.players.iter_mut().find(|player| player.id == player_id) {
            Some(player) => {
                player.upsert_score(score);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn score(id: i32, player_id: PlayerId, day: u32, answer: &str) -> DailyScore {
        DailyScore {
            id,
            player_id,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            answer: answer.to_string(),
            guesses: vec![answer.to_string()],
        }
    }

    fn team_with(player_id: PlayerId) -> Team {
        Team {
            id: 1,
            name: "Breakfast Club".to_string(),
            play_weekends: true,
            players: vec![Player {
                id: player_id,
                email: "ana@example.com".to_string(),
                first_name: Some("Ana".to_string()),
                last_name: None,
                scores: vec![score(1, player_id, 1, "crane")],
            }],
        }
    }

    #[test]
    fn test_update_player_score_replaces_existing() {
        let player_id = Uuid::new_v4();
        let mut team = team_with(player_id);

        assert!(team.update_player_score(player_id, score(1, player_id, 1, "spade")));

        let player = team.player(player_id).unwrap();
        assert_eq!(player.scores.len(), 1);
        assert_eq!(player.scores[0].answer, "spade");
    }

    #[test]
    fn test_update_player_score_appends_new() {
        let player_id = Uuid::new_v4();
        let mut team = team_with(player_id);

        assert!(team.update_player_score(player_id, score(2, player_id, 2, "spade")));
        assert_eq!(team.player(player_id).unwrap().scores.len(), 2);
    }

    #[test]
    fn test_update_player_score_unknown_player() {
        let player_id = Uuid::new_v4();
        let mut team = team_with(player_id);
        let stranger = Uuid::new_v4();

        assert!(!team.update_player_score(stranger, score(3, stranger, 3, "spade")));
        assert_eq!(team.player(player_id).unwrap().scores.len(), 1);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let player_id = Uuid::new_v4();
        let mut player = team_with(player_id).players.remove(0);
        assert_eq!(player.display_name(), "Ana");

        player.last_name = Some("Lopez".to_string());
        assert_eq!(player.display_name(), "Ana Lopez");

        player.first_name = None;
        player.last_name = None;
        assert_eq!(player.display_name(), "ana@example.com");
    }
}
