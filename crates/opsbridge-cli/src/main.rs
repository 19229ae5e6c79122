use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    opsbridge_cli::run().await
}
