//! Bulk team registration from CSV.

use crate::models::{Contest, ContestError, TeamId};

/// Import teams from headerless CSV: one team per record, one player name per field.
/// Blank records are skipped. All-or-nothing: on any bad record the contest is unchanged.
pub fn import_teams_csv(contest: &mut Contest, text: &str) -> Result<Vec<TeamId>, ContestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut staged = contest.clone();
    let mut ids = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ContestError::InvalidImport(e.to_string()))?;
        let players: Vec<String> = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(String::from)
            .collect();
        if players.is_empty() {
            continue;
        }
        let id = staged.add_team(None, None, players).map_err(|e| match e {
            ContestError::InvalidTeamSize { .. } | ContestError::DuplicateTeamName => {
                ContestError::InvalidImport(format!("line {}: {}", line + 1, e))
            }
            other => other,
        })?;
        ids.push(id);
    }

    *contest = staged;
    log::info!("Imported {} team(s) into contest {}", ids.len(), contest.id);
    Ok(ids)
}
