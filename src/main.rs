// src/main.rs

use batchup::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("batchup error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let strict = args.strict;
    let report = run(args).await?;

    if strict && !report.all_ok() {
        return Ok(1);
    }
    Ok(0)
}
