use std::cmp::Ordering;

use board_types::{DailyScore, Player, PlayerMonthSummary, Team, TeamMonthSummary};
use chrono::{Datelike, NaiveDate, Weekday};

use crate::month::MonthKey;

/// Score recorded for a board that was never solved
pub const MISSED_BOARD_SCORE: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardResult {
    Solved { guesses: u32 },
    Missed,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// A board is solved when its last played guess is the answer
    pub fn board_result(score: &DailyScore) -> BoardResult {
        let played: Vec<&str> = score.played_guesses().collect();
        match played.last() {
            Some(last) if last.eq_ignore_ascii_case(&score.answer) => BoardResult::Solved {
                guesses: played.len() as u32,
            },
            _ => BoardResult::Missed,
        }
    }

    /// Lower is better: guesses used, or [`MISSED_BOARD_SCORE`]
    pub fn board_points(score: &DailyScore) -> u32 {
        match Self::board_result(score) {
            BoardResult::Solved { guesses } => guesses,
            BoardResult::Missed => MISSED_BOARD_SCORE,
        }
    }

    pub fn counts_for_team(team: &Team, date: NaiveDate) -> bool {
        team.play_weekends || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn summarize_player(team: &Team, player: &Player, month: MonthKey) -> PlayerMonthSummary {
        let boards: Vec<&DailyScore> = player
            .scores
            .iter()
            .filter(|score| month.contains(score.date) && Self::counts_for_team(team, score.date))
            .collect();

        let boards_played = boards.len() as u32;
        let boards_solved = boards
            .iter()
            .filter(|score| matches!(Self::board_result(score), BoardResult::Solved { .. }))
            .count() as u32;
        let total_score: u32 = boards.iter().map(|score| Self::board_points(score)).sum();
        let average_score =
            (boards_played > 0).then(|| total_score as f64 / boards_played as f64);

        PlayerMonthSummary {
            player_id: player.id,
            display_name: player.display_name(),
            boards_played,
            boards_solved,
            total_score,
            average_score,
            rank: None,
        }
    }

    /// Compare averages exactly by cross-multiplying totals
    fn compare_average(a: &PlayerMonthSummary, b: &PlayerMonthSummary) -> Ordering {
        let left = a.total_score as u64 * b.boards_played as u64;
        let right = b.total_score as u64 * a.boards_played as u64;
        left.cmp(&right)
    }

    /// Per-member totals for one month, best average first. Members with no
    /// boards that month are listed last without a rank.
    pub fn summarize_team_month(team: &Team, month: MonthKey) -> TeamMonthSummary {
        let (mut ranked, mut unranked): (Vec<_>, Vec<_>) = team
            .players
            .iter()
            .map(|player| Self::summarize_player(team, player, month))
            .partition(|summary| summary.boards_played > 0);

        ranked.sort_by(|a, b| {
            Self::compare_average(a, b)
                .then_with(|| b.boards_played.cmp(&a.boards_played))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        // Tied averages share a rank (1, 1, 3)
        let mut previous: Option<(u32, usize)> = None;
        for index in 0..ranked.len() {
            let rank = match previous {
                Some((rank, prev_index))
                    if Self::compare_average(&ranked[prev_index], &ranked[index])
                        == Ordering::Equal =>
                {
                    rank
                }
                _ => index as u32 + 1,
            };
            ranked[index].rank = Some(rank);
            previous = Some((rank, index));
        }

        unranked.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        ranked.extend(unranked);

        TeamMonthSummary {
            team_id: team.id,
            team_name: team.name.clone(),
            month: month.to_string(),
            players: ranked,
        }
    }
}
