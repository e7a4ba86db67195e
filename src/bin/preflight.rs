use book_catalog::infra::config;
use book_catalog::{BookStore, PgBookStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DATABASE_MAX_CONNECTIONS, BIND_ADDR, MAX_UPLOAD_BYTES\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if missing or malformed)
    let database_url = config::database_url()?;
    let max_connections = config::max_connections()?;
    let max_upload = config::max_upload_bytes()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config::bind_addr());
    println!("  DATABASE_MAX_CONNECTIONS={}", max_connections);
    println!("  MAX_UPLOAD_BYTES={}", max_upload);

    // Connecting also creates the books table when it is missing.
    let store = PgBookStore::connect(&database_url, max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot reach PostgreSQL: {}", e))?;
    println!("  Database reachable, books table present.");

    let books = store.count().await?;
    println!("  Stored books: {}", books);

    println!("> Preflight OK.");
    Ok(())
}
