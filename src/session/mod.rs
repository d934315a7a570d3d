//! Work captured by staff: new-student registrations awaiting approval and the
//! log of support interventions. Both persist as plain CSV exports.

pub mod interventions;
pub mod registrations;

pub use interventions::{
    InterventionEntry, InterventionError, InterventionKind, InterventionLog, InterventionOutcome,
    InterventionRequest,
};
pub use registrations::{
    QueueCounts, Registration, RegistrationDraft, RegistrationError, RegistrationQueue,
    RegistrationStatus, Semester,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A missing export is an empty one.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, csv::Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.deserialize().collect()
}

fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
