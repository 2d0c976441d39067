use anyhow::{bail, Result};
use reqwest::blocking::multipart::{Form, Part};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub password: String,
}

// Fire-and-forget: the local save has already succeeded by the time this
// runs, and nothing here can undo it. The outcome message travels back over
// the channel and surfaces in the output log on the next loop turn.
pub fn spawn_upload(
    config: RemoteConfig,
    filename: String,
    payload: String,
    outcome: mpsc::Sender<String>,
) {
    thread::spawn(move || {
        let message = match upload(&config, &filename, payload) {
            Ok(()) => format!("File '{filename}' uploaded to {}.", config.endpoint),
            Err(err) => format!("Failed to upload '{filename}': {err:#}"),
        };
        let _ = outcome.send(message);
    });
}

fn upload(config: &RemoteConfig, filename: &str, payload: String) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(UPLOAD_TIMEOUT)
        .build()?;
    let form = Form::new()
        .text("password", config.password.clone())
        .part("file", Part::text(payload).file_name(filename.to_string()));
    let url = format!(
        "{}/upload/{}",
        config.endpoint.trim_end_matches('/'),
        filename
    );
    let response = client.post(url).multipart(form).send()?;
    let status = response.status();
    if !status.is_success() {
        bail!("{}: {}", status, response.text().unwrap_or_default());
    }
    Ok(())
}
