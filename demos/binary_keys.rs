use snap_kv::{BincodeSerializer, KvStore};

fn main() -> Result<(), snap_kv::Error> {
    let path = std::env::temp_dir().join("snap_kv_example_grid.bin");

    {
        let mut grid = KvStore::<(i32, i32), char>::builder(&path)
            .serializer(BincodeSerializer)
            .build()?;
        grid.set((0, 0), '@')?;
        grid.set((2, -1), '#')?;
        grid.flush()?;
    }

    let grid = KvStore::<(i32, i32), char>::builder(&path)
        .serializer(BincodeSerializer)
        .build()?;
    println!("(2, -1) = {}", grid.get(&(2, -1))?);
    println!("{} cells, {} bytes on disk", grid.len(), std::fs::metadata(&path)?.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
