//! In-memory logger example.
//!
//! Captures records in memory and queries them the way a test would, printing the
//! captured records and the diff produced by a query that does not match.

use ctxlog::prelude::*;

fn main() -> ctxlog::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    println!("ctxlog - in-memory logger example\n");

    let level = std::sync::Arc::new(LevelVar::new(Level::INFO));
    let (logger, records) = new_in_memory_logger(level.clone());

    let worker = logger.with(&[Attr::string("worker", "w-1")]).with_group("job");
    worker.info("Job started", &[Attr::int("id", 7)])?;
    worker.debug("Not captured yet", &[])?;

    level.set(Level::DEBUG);
    worker.debug("Captured now", &[Attr::int("attempt", 1), Attr::int("attempt", 2)])?;

    println!("Captured {} records:", records.len());
    for record in records.as_nested_maps() {
        println!("  {}", serde_json::Value::Object(record));
    }
    println!();

    let query = RecordQuery::new(Level::INFO, "Job started")
        .with_attr("worker", "w-1")
        .with_attr("job.id", 7);
    let (found, _) = records.contains_exact(&query);
    println!("Exact match for 'Job started': {}", found);

    let query = RecordQuery::new(Level::DEBUG, "Captured now").with_attr("job.attempt#01", 3);
    let (found, diff) = records.contains(&query);
    println!("Match for 'Captured now' with attempt#01=3: {}", found);
    println!("Diff:\n{}", diff);

    Ok(())
}
