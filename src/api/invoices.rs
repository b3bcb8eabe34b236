use std::path::{
    Path,
    PathBuf,
};

use tracing::{
    info,
    warn,
};

use super::ApiClient;
use crate::{
    core::{
        http::download_to_file,
        tasks::TaskManager,
        EmberError,
    },
    search::InvoiceSelection,
};

#[derive(Debug)]
pub struct DownloadOutcome {
    pub url: String,
    pub result: Result<PathBuf, EmberError>,
}

/// Last path segment of `url` when it looks like a file name, otherwise
/// `invoice-<n>.pdf`.
pub fn invoice_file_name(url: &str, index: usize) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => path,
    };

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| segment.contains('.') && !segment.starts_with('.'))
        .filter(|segment| !segment.contains(['\\', ':']))
        .map(str::to_string)
        .unwrap_or_else(|| format!("invoice-{}.pdf", index + 1))
}

/// Downloads the selected invoices into `dir`, selecting everything first when
/// nothing is picked. A failing URL does not stop the others; outcomes come back
/// in selection order.
pub async fn download_invoices(
    client: &ApiClient,
    selection: &mut InvoiceSelection,
    available: &[String],
    dir: &Path,
) -> Result<Vec<DownloadOutcome>, EmberError> {
    let targets = selection.download_targets(available);
    if targets.is_empty() {
        info!("no invoices to download");
        return Ok(Vec::new());
    }

    tokio::fs::create_dir_all(dir).await?;

    let mut tasks = TaskManager::<(usize, DownloadOutcome)>::new()?;
    let sender = tasks.sender();
    for (index, url) in targets.iter().enumerate() {
        let http = client.http().clone();
        let absolute = client.url(url);
        let path = dir.join(invoice_file_name(url, index));
        let url = url.clone();

        sender.spawn(async move {
            let result = download_to_file(&http, &absolute, &path).await.map(|_| path);
            (index, DownloadOutcome { url, result })
        });
    }

    let mut outcomes = Vec::with_capacity(targets.len());
    while outcomes.len() < targets.len() {
        let Some((index, outcome)) = tasks.next_result().await else {
            break;
        };
        match &outcome.result {
            Ok(path) => info!(url = %outcome.url, path = %path.display(), "invoice downloaded"),
            Err(e) => warn!(url = %outcome.url, "invoice download failed: {e}"),
        }
        outcomes.push((index, outcome));
    }

    outcomes.sort_by_key(|(index, _)| *index);
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}
