use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PanelzError, Result};
use crate::store::{keys, Db, Record, StorageBackend};
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Directory prefix of every entry in an archive.
pub const ARCHIVE_DIR: &str = "panelz";

/// Writes all four collections into `panelz-<timestamp>.tar.gz` inside `dest`.
pub fn run<B: StorageBackend>(db: &Db<B>, dest: &Path) -> Result<CmdResult> {
    let entries = collect_entries(db)?;
    let total: usize = entries.iter().map(|(_, count, _)| count).sum();

    let filename = format!("panelz-{}.tar.gz", Utc::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = dest.join(filename);
    let file = File::create(&path).map_err(PanelzError::Io)?;
    write_archive(file, &entries)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} record(s) to {}",
        total,
        path.display()
    )));
    Ok(result.with_paths(vec![path]))
}

/// `(key, record count, pretty JSON)` per collection, in `keys::COLLECTIONS` order.
fn collect_entries<B: StorageBackend>(db: &Db<B>) -> Result<Vec<(&'static str, usize, String)>> {
    Ok(vec![
        entry(&db.candidates().list())?,
        entry(&db.interviewers().list())?,
        entry(&db.interviews().list())?,
        entry(&db.feedback().list())?,
    ])
}

fn entry<R: Record>(records: &[R]) -> Result<(&'static str, usize, String)> {
    let json = serde_json::to_string_pretty(records).map_err(PanelzError::Serialization)?;
    Ok((R::KEY, records.len(), json))
}

fn write_archive<W: Write>(writer: W, entries: &[(&'static str, usize, String)]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for (key, _, json) in entries {
        debug_assert!(keys::COLLECTIONS.contains(key));
        let mut header = tar::Header::new_gnu();
        header.set_size(json.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(
            &mut header,
            format!("{}/{}.json", ARCHIVE_DIR, key),
            json.as_bytes(),
        )
        .map_err(PanelzError::Io)?;
    }

    tar.into_inner()
        .map_err(PanelzError::Io)?
        .finish()
        .map_err(PanelzError::Io)?;
    Ok(())
}
