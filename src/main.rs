use std::process::ExitCode;
use threefinger::config::Settings;
use threefinger::daemon::{self, Shutdown};
use threefinger::logger;
use tracing::{error, info};

fn main() -> ExitCode {
    let settings = Settings::default();
    logger::init(&settings.log_file);
    info!("Starting three-finger-select");

    match daemon::run(settings) {
        Ok(Shutdown::Interrupted) | Ok(Shutdown::StreamClosed) => ExitCode::SUCCESS,
        Ok(Shutdown::StreamFailed) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
