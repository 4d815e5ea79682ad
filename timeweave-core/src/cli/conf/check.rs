use crate::conf::load_session;
use std::path::PathBuf;

pub fn check(path: PathBuf) -> anyhow::Result<()> {
    let session = load_session(&path)?;

    println!("✔ Session loaded successfully");
    println!("✔ {} sources", session.config.sources.len());
    println!("✔ {} outputs", session.entries.len());
    println!(
        "✔ {} records",
        session
            .entries
            .iter()
            .map(|e| e.output.events().len())
            .sum::<usize>()
    );
    println!(
        "✔ {} sources hidden",
        session.config.sources.iter().filter(|s| !s.visible).count()
    );

    Ok(())
}
