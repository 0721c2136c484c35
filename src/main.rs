use book_harvester::aggregate::{price_comparison, source_counts};
use book_harvester::export;
use book_harvester::fetch::{Fetcher, HttpTransport};
use book_harvester::harvest::HarvestOrchestrator;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transport = Arc::new(HttpTransport::new()?);
    let fetcher = Fetcher::new(transport);
    let orchestrator = HarvestOrchestrator::default_plan(fetcher)?;

    let records = orchestrator.run().await;
    info!(total = records.len(), "harvest complete");

    export::write_csv(&records, Path::new("books_data.csv"))?;
    export::write_json(&records, Path::new("books_data.json"))?;

    println!("\n=== Harvest Summary ===");
    println!("Total books collected: {}", records.len());

    println!("\nBooks per source:");
    for (source, count) in source_counts(&records) {
        println!("  {source}: {count}");
    }

    println!("\n=== Sample Price Comparisons ===");
    let comparisons = price_comparison(&records);
    for (title, group) in comparisons.iter().filter(|(_, group)| group.len() > 1).take(5) {
        println!("\n'{title}':");
        for book in group {
            if let Some(price) = book.price {
                println!("  {price:.2} at {}", book.source);
            }
        }
    }

    Ok(())
}
