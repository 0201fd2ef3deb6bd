use crate::error::Result;
use crate::model::{UserEngagementRecord, WinnerRecord};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write `Name,Username` rows for every qualified entrant.
pub fn write_qualified_csv<W: Write>(writer: W, qualified: &[UserEngagementRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(["Name", "Username"])?;
    for record in qualified {
        if let Some(account) = record.account() {
            csv.write_record([account.name.as_str(), account.username.as_str()])?;
        }
    }
    csv.flush()?;

    Ok(())
}

pub fn save_qualified_csv(path: &Path, qualified: &[UserEngagementRecord]) -> Result<()> {
    write_qualified_csv(File::create(path)?, qualified)?;
    tracing::info!(path = %path.display(), rows = qualified.len(), "wrote qualified entrants");
    Ok(())
}

pub fn save_winner(path: &Path, winner: &WinnerRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(winner)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "wrote winner record");
    Ok(())
}
