use std::{
    path::Path,
    time::Duration,
};

use reqwest::{
    header::ACCEPT_ENCODING,
    Client,
    Response,
};
use tokio::{
    fs::File,
    io::AsyncWriteExt,
};

use crate::core::EmberError;

pub const CLIENT_USER_AGENT: &str = "embermail-client/0.4 (+reqwest)";

pub fn http_client(timeout: Option<Duration>) -> Result<Client, EmberError> {
    let mut builder = Client::builder().user_agent(CLIENT_USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| EmberError::Custom(format!("HTTP client build failed: {e}")))
}

/// Single GET streamed into `path`. Failures are returned, never retried.
pub async fn download_to_file(client: &Client, url: &str, path: &Path) -> Result<u64, EmberError> {
    let mut resp = client
        .get(url)
        .header(ACCEPT_ENCODING, "identity")
        .send()
        .await?;

    ensure_success(&resp)?;

    let mut file = File::create(path).await.map_err(|e| {
        EmberError::Custom(format!("Create download file {:?} failed: {}", path, e))
    })?;

    let mut written: u64 = 0;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    if written == 0 {
        return Err(EmberError::Custom(format!("Empty response body from {}", url)));
    }
    Ok(written)
}

pub fn ensure_success(resp: &Response) -> Result<(), EmberError> {
    if !resp.status().is_success() {
        return Err(EmberError::Http {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(())
}
