use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PanelzError, Result};
use crate::model::{Candidate, Feedback, Interview, Interviewer};
use crate::store::{keys, Db, Record, StorageBackend};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads an archive written by `export` and appends every record whose id is
/// not already stored. Entries other than the four collections are skipped.
pub fn run<B: StorageBackend>(db: &Db<B>, archive: &Path) -> Result<CmdResult> {
    if !archive.is_file() {
        return Err(PanelzError::Api(format!(
            "Archive not found: {}",
            archive.display()
        )));
    }
    let file = File::open(archive).map_err(PanelzError::Io)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    let mut result = CmdResult::default();
    let mut total = 0;

    for entry in tar.entries().map_err(PanelzError::Io)? {
        let mut entry = entry.map_err(PanelzError::Io)?;
        let path = entry.path().map_err(PanelzError::Io)?.into_owned();
        let key = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if keys::COLLECTIONS.contains(&stem) => stem.to_string(),
            _ => {
                debug!(entry = %path.display(), "skipping archive entry");
                continue;
            }
        };

        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(PanelzError::Io)?;

        let added = import_collection(db, &key, &content)?;
        total += added;
        result.add_message(CmdMessage::info(format!("{}: {} added", key, added)));
    }

    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        total
    )));
    Ok(result)
}

fn import_collection<B: StorageBackend>(db: &Db<B>, key: &str, content: &str) -> Result<usize> {
    match key {
        keys::CANDIDATES => insert::<B, Candidate>(db, content),
        keys::INTERVIEWERS => insert::<B, Interviewer>(db, content),
        keys::INTERVIEWS => insert::<B, Interview>(db, content),
        keys::FEEDBACK => insert::<B, Feedback>(db, content),
        other => Err(PanelzError::Store(format!("unknown collection: {}", other))),
    }
}

fn insert<B: StorageBackend, R: Record>(db: &Db<B>, content: &str) -> Result<usize> {
    let records: Vec<R> = serde_json::from_str(content).map_err(PanelzError::Serialization)?;
    db.collection::<R>().insert_many(records)
}
