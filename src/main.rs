use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match prov_toolkit::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Command failed");
            eprintln!("prov-toolkit: {error}");
            ExitCode::FAILURE
        }
    }
}
