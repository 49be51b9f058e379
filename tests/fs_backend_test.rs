use panelz::model::{NewCandidate, Status};
use panelz::store::fs_backend::FsBackend;
use panelz::store::{keys, Db, StorageBackend};
use std::fs;
use tempfile::TempDir;

fn ada() -> NewCandidate {
    NewCandidate {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: Some("ada@x.com".into()),
        ..Default::default()
    }
}

#[test]
fn records_survive_a_new_db() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");

    let created = Db::new(FsBackend::new(root.clone()))
        .candidates()
        .create(ada())
        .unwrap();

    let reopened = Db::new(FsBackend::new(root.clone()));
    assert_eq!(reopened.candidates().get(&created.id), Some(created));
    assert!(root.join("candidates.json").exists());
}

#[test]
fn writes_leave_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let backend = FsBackend::new(temp.path().to_path_buf());
    let db = Db::new(backend);
    for _ in 0..3 {
        db.candidates().create(ada()).unwrap();
    }

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["candidates.json".to_string()]);
    assert_eq!(db.storage().backend().keys().unwrap(), vec![keys::CANDIDATES]);
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("candidates.json"), "{not json").unwrap();

    let db = Db::new(FsBackend::new(temp.path().to_path_buf()));
    assert!(db.candidates().list().is_empty());

    let created = db.candidates().create(ada()).unwrap();
    assert_eq!(created.status, Status::Scheduled);
    assert_eq!(db.candidates().list().len(), 1);
}

#[test]
fn legacy_numeric_ids_are_readable() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("candidates.json"),
        r#"[{"id":1712345678901,"firstName":"Ada","lastName":"Lovelace","status":"completed"}]"#,
    )
    .unwrap();

    let db = Db::new(FsBackend::new(temp.path().to_path_buf()));
    let found = db.candidates().get("1712345678901").unwrap();
    assert_eq!(found.status, Status::Completed);
}
