use snap_kv::KvStore;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("snap_kv_test_{}.json", name))
}

fn on_disk(path: &std::path::Path) -> KvStore<String, Vec<i32>> {
    KvStore::open(path).unwrap()
}

#[test]
fn autosync_set_is_visible_to_a_second_store() {
    let path = temp_path("autosync_set");
    let _ = std::fs::remove_file(&path);
    let mut db = KvStore::<String, Vec<i32>>::new(&path, true).unwrap();
    assert!(db.autosync());
    db.set("x".into(), vec![1, 2, 3]).unwrap();

    let reader = on_disk(&path);
    assert_eq!(reader.get("x").unwrap(), &vec![1, 2, 3]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn autosync_delete_hits_disk() {
    let path = temp_path("autosync_delete");
    let _ = std::fs::remove_file(&path);
    let mut db = KvStore::<String, Vec<i32>>::new(&path, true).unwrap();
    db.set("a".into(), vec![1]).unwrap();
    db.set("b".into(), vec![2]).unwrap();
    db.delete("a").unwrap();

    let reader = on_disk(&path);
    assert_eq!(reader.len(), 1);
    assert!(!reader.contains_key("a"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn autosync_covers_bulk_mutations() {
    let path = temp_path("autosync_bulk");
    let _ = std::fs::remove_file(&path);
    let mut db = KvStore::<String, Vec<i32>>::new(&path, true).unwrap();
    db.extend(vec![("a".into(), vec![1]), ("b".into(), vec![2])])
        .unwrap();
    assert_eq!(on_disk(&path).len(), 2);

    db.update("a", |v| v.push(10)).unwrap();
    assert_eq!(on_disk(&path).get("a").unwrap(), &vec![1, 10]);

    db.clear().unwrap();
    assert!(on_disk(&path).is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn manual_mode_leaves_file_alone_until_flush() {
    let path = temp_path("manual");
    let _ = std::fs::remove_file(&path);
    let mut db = KvStore::<String, Vec<i32>>::new(&path, false).unwrap();
    assert!(!db.autosync());
    db.set("a".into(), vec![1]).unwrap();
    assert!(!path.exists());

    db.flush().unwrap();
    let before = std::fs::read(&path).unwrap();

    db.set("b".into(), vec![2]).unwrap();
    db.delete("a").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), before);

    db.flush().unwrap();
    let reader = on_disk(&path);
    assert_eq!(reader.len(), 1);
    assert_eq!(reader.get("b").unwrap(), &vec![2]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn builder_autosync_flag() {
    let path = temp_path("builder_autosync");
    let _ = std::fs::remove_file(&path);
    {
        let mut db = KvStore::<String, Vec<i32>>::builder(&path)
            .autosync(true)
            .build()
            .unwrap();
        db.set("x".into(), vec![1]).unwrap();
    }
    assert_eq!(on_disk(&path).get("x").unwrap(), &vec![1]);
    let _ = std::fs::remove_file(&path);
}
