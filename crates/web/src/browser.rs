use std::time::Duration;

use tokio::process::Command;

const LAUNCH_DELAY: Duration = Duration::from_secs(1);

#[cfg(target_os = "macos")]
const OPENER: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPENER: &[&str] = &["cmd", "/C", "start", ""];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &[&str] = &["xdg-open"];

pub fn local_url(port: u16) -> String {
    format!("http://127.0.0.1:{port}/")
}

/// Opens the local site in the default browser once the listener is up.
/// Failures are logged and otherwise ignored.
pub fn open_after_startup(port: u16) {
    let url = local_url(port);

    tokio::spawn(async move {
        tokio::time::sleep(LAUNCH_DELAY).await;

        let Some((program, args)) = OPENER.split_first() else {
            return;
        };

        match Command::new(program).args(args).arg(&url).spawn() {
            Ok(_) => tracing::debug!("Opened browser at {}", url),
            Err(e) => tracing::warn!("Could not open browser at {}: {}", url, e),
        }
    });
}
