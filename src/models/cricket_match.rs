//! Match, toss, and the enums describing where a match sits in the tournament.

use crate::models::innings::{CricketMatchResult, InningsScore};
use serde::{Deserialize, Serialize};

/// Identifier for a match (`RR-001`, `SF-002`, `F-001`, ...).
pub type MatchId = String;

/// Placeholder team name for a playoff slot that has not been resolved yet.
pub const TBD: &str = "TBD";

/// Stored status of a match. The finer-grained lifecycle state is derived, see `logic::lifecycle`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Stage of the tournament a match (or the whole tournament) is in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentPhase {
    /// Adding teams and choosing settings; nothing generated yet.
    #[default]
    Setup,
    RoundRobin,
    Playoffs,
    Completed,
}

/// Position of a playoff match in the bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayoffType {
    #[serde(rename = "semi-final-1")]
    SemiFinal1,
    #[serde(rename = "semi-final-2")]
    SemiFinal2,
    #[serde(rename = "qualifier-1")]
    Qualifier1,
    Eliminator,
    #[serde(rename = "qualifier-2")]
    Qualifier2,
    Final,
}

impl PlayoffType {
    /// Human readable name, e.g. for status descriptions.
    pub fn label(self) -> &'static str {
        match self {
            PlayoffType::SemiFinal1 => "Semi-final 1",
            PlayoffType::SemiFinal2 => "Semi-final 2",
            PlayoffType::Qualifier1 => "Qualifier 1",
            PlayoffType::Eliminator => "Eliminator",
            PlayoffType::Qualifier2 => "Qualifier 2",
            PlayoffType::Final => "Final",
        }
    }
}

/// Lifecycle state of a match, derived from its stored fields by `logic::lifecycle::match_state`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchState {
    NotStarted,
    InProgressNeedToss,
    FirstInningsReady,
    FirstInningsComplete,
    SecondInningsReady,
    ReadyToFinish,
    Completed,
    Cancelled,
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchState::NotStarted => "not started",
            MatchState::InProgressNeedToss => "waiting for the toss",
            MatchState::FirstInningsReady => "first innings in play",
            MatchState::FirstInningsComplete => "between innings",
            MatchState::SecondInningsReady => "second innings in play",
            MatchState::ReadyToFinish => "ready to finish",
            MatchState::Completed => "completed",
            MatchState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Toss call made by the toss winner.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TossResult {
    pub toss_winner: String,
    pub decision: TossDecision,
    pub toss_loser: String,
}

/// Which side of a match a team slot refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Team1,
    Team2,
}

/// A single cricket match, round robin or playoff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CricketMatch {
    pub id: MatchId,
    /// Team name, or [`TBD`] for an unresolved playoff slot.
    pub team1: String,
    pub team2: String,
    pub round: u32,
    pub status: MatchStatus,
    /// Overs per innings for this match.
    pub overs: u32,
    pub max_wickets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toss: Option<TossResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1_innings: Option<InningsScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2_innings: Option<InningsScore>,
    #[serde(default)]
    pub second_innings_started: bool,
    /// Set once the match is finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CricketMatchResult>,
    pub is_playoff: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playoff_type: Option<PlayoffType>,
    pub phase: TournamentPhase,
}

impl CricketMatch {
    /// A scheduled round-robin match.
    pub fn round_robin(
        id: impl Into<MatchId>,
        team1: impl Into<String>,
        team2: impl Into<String>,
        round: u32,
        overs: u32,
        max_wickets: u32,
    ) -> Self {
        Self {
            id: id.into(),
            team1: team1.into(),
            team2: team2.into(),
            round,
            status: MatchStatus::Scheduled,
            overs,
            max_wickets,
            toss: None,
            team1_innings: None,
            team2_innings: None,
            second_innings_started: false,
            result: None,
            is_playoff: false,
            playoff_type: None,
            phase: TournamentPhase::RoundRobin,
        }
    }

    /// A scheduled playoff match with both slots still TBD.
    pub fn playoff(
        id: impl Into<MatchId>,
        playoff_type: PlayoffType,
        round: u32,
        overs: u32,
        max_wickets: u32,
    ) -> Self {
        Self {
            is_playoff: true,
            playoff_type: Some(playoff_type),
            phase: TournamentPhase::Playoffs,
            ..Self::round_robin(id, TBD, TBD, round, overs, max_wickets)
        }
    }

    pub fn team(&self, slot: Slot) -> &str {
        match slot {
            Slot::Team1 => &self.team1,
            Slot::Team2 => &self.team2,
        }
    }

    pub fn team_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Team1 => &mut self.team1,
            Slot::Team2 => &mut self.team2,
        }
    }

    /// Which slot `team` occupies, if it plays in this match.
    pub fn slot_of(&self, team: &str) -> Option<Slot> {
        if self.team1 == team {
            Some(Slot::Team1)
        } else if self.team2 == team {
            Some(Slot::Team2)
        } else {
            None
        }
    }

    pub fn innings(&self, slot: Slot) -> Option<&InningsScore> {
        match slot {
            Slot::Team1 => self.team1_innings.as_ref(),
            Slot::Team2 => self.team2_innings.as_ref(),
        }
    }

    /// True when both slots hold real team names.
    pub fn teams_resolved(&self) -> bool {
        self.team1 != TBD && self.team2 != TBD
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Completed or cancelled: nothing more can happen to this match.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    pub fn winner(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.winner.as_deref())
    }

    pub fn loser(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.loser.as_deref())
    }
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::Team1 => Slot::Team2,
            Slot::Team2 => Slot::Team1,
        }
    }
}
