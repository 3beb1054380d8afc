//! Standings as CSV, for spreadsheets and printing.

use crate::logic::statistics::format_nrr;
use crate::models::CricketTeamStats;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct StandingsRow<'a> {
    #[serde(rename = "Pos")]
    position: usize,
    #[serde(rename = "Team")]
    team: &'a str,
    #[serde(rename = "P")]
    played: u32,
    #[serde(rename = "W")]
    won: u32,
    #[serde(rename = "L")]
    lost: u32,
    #[serde(rename = "D")]
    drawn: u32,
    #[serde(rename = "NR")]
    no_result: u32,
    #[serde(rename = "Pts")]
    points: u32,
    #[serde(rename = "NRR")]
    nrr: String,
}

/// One row per team in the given order, with a header row.
pub fn standings_csv(standings: &[CricketTeamStats]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, s) in standings.iter().enumerate() {
        writer.serialize(StandingsRow {
            position: i + 1,
            team: &s.team_name,
            played: s.matches_played,
            won: s.matches_won,
            lost: s.matches_lost,
            drawn: s.matches_drawn,
            no_result: s.matches_no_result,
            points: s.points,
            nrr: format_nrr(s.net_run_rate),
        })?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
