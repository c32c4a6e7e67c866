use snap_kv::KvStore;

fn main() -> Result<(), snap_kv::Error> {
    let path = std::env::temp_dir().join("snap_kv_example_basic.json");
    let mut db = KvStore::<String, i32>::open(&path)?;

    // set / get / delete
    db.set("apples".into(), 3)?;
    db.set("bananas".into(), 5)?;
    println!("apples  = {}", db.get("apples")?);
    println!("bananas = {}", db["bananas"]);

    // update in place
    db.update("apples", |n| *n += 1)?;
    println!("apples after update = {}", db.get("apples")?);

    // get_or_insert_with
    let oranges = *db.get_or_insert_with("oranges".into(), || 0)?;
    println!("oranges (default 0) = {oranges}");

    // bulk insert
    db.extend(vec![("grapes".into(), 12), ("lemons".into(), 7)])?;
    db.delete("bananas")?;

    println!("keys   = {:?}", db.keys().collect::<Vec<_>>());
    println!("len    = {}", db.len());

    // persist, then reopen from disk
    db.flush()?;
    let reopened = KvStore::<String, i32>::open(&path)?;
    println!("reopened: len = {}", reopened.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
