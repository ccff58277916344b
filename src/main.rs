use clap::Parser;
use station_nc_collector::cli::{self, Args};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Stop between stations on CTRL+C; an in-flight copy may be left partial
        tokio::select! {
            result = cli::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                let reason = match signal {
                    Ok(()) => "Collection interrupted by user".to_string(),
                    Err(e) => format!("Failed to listen for CTRL+C: {}", e),
                };
                Err(station_nc_collector::CollectorError::interrupted(reason).into())
            }
        }
    });

    match result {
        Ok(stats) if stats.has_failures() => {
            eprintln!(
                "Error: {} station(s) failed, see log for details",
                stats.stations_failed
            );
            process::exit(1);
        }
        Ok(_stats) => {
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
