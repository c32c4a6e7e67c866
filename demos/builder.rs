use snap_kv::KvStore;

fn main() -> Result<(), snap_kv::Error> {
    let path = std::env::temp_dir().join("snap_kv_example_builder.json");

    // pretty-printed JSON, flushed through a temp file after every mutation
    let mut db = KvStore::<String, Vec<String>>::builder(&path)
        .pretty(true)
        .autosync(true)
        .atomic(true)
        .build()?;

    db.set("name".into(), vec!["snap-kv".into()])?;
    db.set("tags".into(), vec!["json".into(), "snapshot".into()])?;

    // no flush() needed, autosync already wrote it
    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_file(&path);
    Ok(())
}
