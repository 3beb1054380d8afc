//! Filling TBD playoff slots: seeding from the standings, then advancing winners (and, in the
//! league format, the qualifier 1 loser) through the bracket.
//!
//! Both steps only ever write into a slot that still holds TBD, so running them again is a no-op.

use crate::logic::bracket::qualifier_count;
use crate::logic::statistics::{compute_team_stats, get_tournament_standings};
use crate::models::{CricketMatch, MatchId, PlayoffFormat, PlayoffType, Slot, TournamentState, TBD};
use serde::{Deserialize, Serialize};

/// Which team of a completed match moves on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Advances {
    Winner,
    Loser,
}

/// `from`'s winner or loser takes `slot` of `to`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Advancement {
    pub from: PlayoffType,
    pub advances: Advances,
    pub to: PlayoffType,
    pub slot: Slot,
}

const WORLD_CUP_ADVANCEMENTS: &[Advancement] = &[
    Advancement { from: PlayoffType::SemiFinal1, advances: Advances::Winner, to: PlayoffType::Final, slot: Slot::Team1 },
    Advancement { from: PlayoffType::SemiFinal2, advances: Advances::Winner, to: PlayoffType::Final, slot: Slot::Team2 },
];

const LEAGUE_ADVANCEMENTS: &[Advancement] = &[
    Advancement { from: PlayoffType::Qualifier1, advances: Advances::Winner, to: PlayoffType::Final, slot: Slot::Team1 },
    Advancement { from: PlayoffType::Qualifier1, advances: Advances::Loser, to: PlayoffType::Qualifier2, slot: Slot::Team1 },
    Advancement { from: PlayoffType::Eliminator, advances: Advances::Winner, to: PlayoffType::Qualifier2, slot: Slot::Team2 },
    Advancement { from: PlayoffType::Qualifier2, advances: Advances::Winner, to: PlayoffType::Final, slot: Slot::Team2 },
];

/// Bracket edges for a format.
pub fn advancements(format: PlayoffFormat) -> &'static [Advancement] {
    match format {
        PlayoffFormat::WorldCup => WORLD_CUP_ADVANCEMENTS,
        PlayoffFormat::League => LEAGUE_ADVANCEMENTS,
    }
}

/// First-layer seeding as (match, rank index of team 1, rank index of team 2), ranks 0-based.
pub fn seeding(team_count: usize, format: PlayoffFormat) -> Vec<(PlayoffType, usize, usize)> {
    match (qualifier_count(team_count), format) {
        (0, _) => Vec::new(),
        (2, _) => vec![(PlayoffType::Final, 0, 1)],
        (_, PlayoffFormat::WorldCup) => vec![(PlayoffType::SemiFinal1, 0, 3), (PlayoffType::SemiFinal2, 1, 2)],
        (_, PlayoffFormat::League) => vec![(PlayoffType::Qualifier1, 0, 1), (PlayoffType::Eliminator, 2, 3)],
    }
}

/// One slot filled by the resolver.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffUpdate {
    pub match_id: MatchId,
    pub playoff_type: PlayoffType,
    pub slot: Slot,
    pub team: String,
}

/// Result of a resolver pass. `success == false` with no updates means nothing new to resolve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub success: bool,
    pub updated_matches: Vec<CricketMatch>,
    pub updates: Vec<PlayoffUpdate>,
}

impl ResolutionOutcome {
    fn new(updated_matches: Vec<CricketMatch>, updates: Vec<PlayoffUpdate>) -> Self {
        Self {
            success: !updates.is_empty(),
            updated_matches,
            updates,
        }
    }

    /// Concatenate two passes; the second pass already saw the first one's matches.
    fn then(self, next: ResolutionOutcome) -> Self {
        let mut updates = self.updates;
        updates.extend(next.updates);
        Self::new(next.updated_matches, updates)
    }
}

/// True once there is at least one round-robin match and none is left to play.
///
/// Cancelled round-robin matches count as settled.
pub fn is_round_robin_complete(state: &TournamentState) -> bool {
    let mut rr = state.round_robin_matches().peekable();
    rr.peek().is_some() && rr.all(|m| m.is_finished())
}

fn find_playoff(matches: &[CricketMatch], playoff_type: PlayoffType) -> Option<&CricketMatch> {
    matches
        .iter()
        .find(|m| m.is_playoff && m.playoff_type == Some(playoff_type))
}

fn slot_is_tbd(matches: &[CricketMatch], playoff_type: PlayoffType, slot: Slot) -> bool {
    find_playoff(matches, playoff_type).is_some_and(|m| m.team(slot) == TBD)
}

/// Write `team` into a TBD slot; resolved slots are left alone.
fn fill_slot(
    matches: &mut [CricketMatch],
    playoff_type: PlayoffType,
    slot: Slot,
    team: &str,
    updates: &mut Vec<PlayoffUpdate>,
) {
    if team == TBD {
        return;
    }
    let Some(m) = matches
        .iter_mut()
        .find(|m| m.is_playoff && m.playoff_type == Some(playoff_type))
    else {
        return;
    };
    if m.team(slot) != TBD {
        return;
    }
    *m.team_mut(slot) = team.to_string();
    log::debug!("Playoff {} {:?} resolved to {}", m.id, slot, team);
    updates.push(PlayoffUpdate {
        match_id: m.id.clone(),
        playoff_type,
        slot,
        team: team.to_string(),
    });
}

/// Team names in standings order, from the current round-robin results.
pub fn ranked_teams(state: &TournamentState) -> Vec<String> {
    get_tournament_standings(&compute_team_stats(&state.teams, &state.matches))
        .into_iter()
        .map(|s| s.team_name)
        .collect()
}

/// Teams that go through to the playoffs, best first. Empty until the round robin is complete.
pub fn qualified_teams(state: &TournamentState) -> Vec<String> {
    if !is_round_robin_complete(state) {
        return Vec::new();
    }
    let mut ranked = ranked_teams(state);
    ranked.truncate(qualifier_count(state.teams.len()));
    ranked
}

/// True when the round robin is complete and a first-layer slot is still TBD.
pub fn needs_seeding(state: &TournamentState) -> bool {
    is_round_robin_complete(state)
        && seeding(state.teams.len(), state.playoff_format)
            .iter()
            .any(|&(pt, _, _)| {
                slot_is_tbd(&state.matches, pt, Slot::Team1) || slot_is_tbd(&state.matches, pt, Slot::Team2)
            })
}

/// Put the top-ranked teams into the first bracket layer.
pub fn seed_playoffs(state: &TournamentState) -> ResolutionOutcome {
    let mut matches = state.matches.clone();
    let mut updates = Vec::new();
    if !is_round_robin_complete(state) {
        return ResolutionOutcome::new(matches, updates);
    }
    let ranked = ranked_teams(state);
    for (playoff_type, r1, r2) in seeding(state.teams.len(), state.playoff_format) {
        let (Some(t1), Some(t2)) = (ranked.get(r1), ranked.get(r2)) else {
            continue;
        };
        fill_slot(&mut matches, playoff_type, Slot::Team1, t1, &mut updates);
        fill_slot(&mut matches, playoff_type, Slot::Team2, t2, &mut updates);
    }
    if !updates.is_empty() {
        log::info!("Seeded playoffs: {} slot(s) filled", updates.len());
    }
    ResolutionOutcome::new(matches, updates)
}

fn advancing_team(m: &CricketMatch, advances: Advances) -> Option<&str> {
    if !m.is_completed() {
        return None;
    }
    match advances {
        Advances::Winner => m.winner(),
        Advances::Loser => m.loser(),
    }
}

/// True when a completed playoff match can fill a TBD slot further down the bracket.
pub fn has_resolvable_tbd_teams(state: &TournamentState) -> bool {
    advancements(state.playoff_format).iter().any(|a| {
        find_playoff(&state.matches, a.from)
            .and_then(|m| advancing_team(m, a.advances))
            .is_some()
            && slot_is_tbd(&state.matches, a.to, a.slot)
    })
}

/// Advance results of completed playoff matches into dependent slots.
pub fn propagate_playoff_results(state: &TournamentState) -> ResolutionOutcome {
    let mut matches = state.matches.clone();
    let mut updates = Vec::new();
    for a in advancements(state.playoff_format) {
        let team = find_playoff(&matches, a.from)
            .and_then(|m| advancing_team(m, a.advances))
            .map(str::to_string);
        if let Some(team) = team {
            fill_slot(&mut matches, a.to, a.slot, &team, &mut updates);
        }
    }
    ResolutionOutcome::new(matches, updates)
}

/// Seeding followed by propagation.
pub fn resolve_playoffs(state: &TournamentState) -> ResolutionOutcome {
    let seeded = seed_playoffs(state);
    let next = TournamentState {
        matches: seeded.updated_matches.clone(),
        ..state.clone()
    };
    seeded.then(propagate_playoff_results(&next))
}
