use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use jsu::poll::{PageVisibility, PollingManager};
use jsu::request::{Body, Method, ReqwestTransport, Request, fingerprint};
use jsu::upload::{UploadError, UploadSource};
use jsu::util::UserAgent;
use jsu::util::format::size_display;
use jsu::{JsuConfig, Toolkit};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::progress::UploadBar;

const USER_AGENT: &str = concat!("jsu/", env!("CARGO_PKG_VERSION"));

pub(crate) struct UploadArgs {
    pub file: std::path::PathBuf,
    pub upload_url: String,
    pub complete_url: String,
    pub chunk_size: Option<u64>,
    pub max_retry: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub max_retry_delay_ms: Option<u64>,
    pub suffix: Option<String>,
    pub fields: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

fn toolkit(config: JsuConfig) -> Result<Toolkit<ReqwestTransport>> {
    Toolkit::with_reqwest(config, USER_AGENT).context("failed to build the HTTP client")
}

pub(crate) async fn upload(mut config: JsuConfig, args: UploadArgs) -> Result<()> {
    if let Some(chunk_size) = args.chunk_size {
        config.upload.chunk_size = chunk_size;
    }
    if let Some(max_retry) = args.max_retry {
        config.upload.max_retry = max_retry;
    }
    if let Some(delay) = args.retry_delay_ms {
        config.upload.retry_delay_ms = delay;
    }
    if args.max_retry_delay_ms.is_some() {
        config.upload.max_retry_delay_ms = args.max_retry_delay_ms;
    }

    let source = UploadSource::from_path(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let toolkit = toolkit(config)?;
    info!(file = %args.file.display(), size = %size_display(toolkit.catalog(), source.len()), "uploading");

    let bar = UploadBar::new(source.name());
    let progress = bar.clone();
    let retrying = bar.clone();
    let session = toolkit
        .uploader_with(source, args.upload_url, args.complete_url, |mut options| {
            if let Some(suffix) = args.suffix {
                options = options.file_name_suffix(suffix);
            }
            for (name, value) in args.fields {
                options = options.extra_field(name, value);
            }
            for (name, value) in args.headers {
                options = options.extra_header(name, value);
            }
            options
                .on_progress(move |percent| progress.set(percent))
                .on_retry(move |ctx| {
                    retrying.message(format!("{} retry {} at byte {}", ctx.phase, ctx.attempt, ctx.offset));
                    None
                })
        })
        .context("invalid upload options")?;

    let cancel = session.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let outcome = session.run().await;
    interrupt.abort();

    match outcome {
        Ok(upload_id) => {
            bar.finish(format!("done, upload_id {upload_id}"));
            println!("{upload_id}");
            Ok(())
        }
        Err(UploadError::Cancelled) => {
            bar.abandon("cancelled".to_string());
            bail!("upload cancelled")
        }
        Err(e) => {
            bar.abandon(e.to_string());
            Err(e).context("upload failed")
        }
    }
}

pub(crate) fn fingerprint_of(
    config: &JsuConfig,
    method: &str,
    url: &str,
    json_body: Option<&str>,
    headers: &[(String, String)],
) -> Result<String> {
    let Some(method) = Method::parse(method) else {
        bail!("unknown HTTP method '{method}'");
    };
    let body = match json_body {
        Some(raw) => Body::Json(serde_json::from_str(raw).context("--json is not valid JSON")?),
        None => Body::Empty,
    };
    let key = fingerprint(method, url, &body, headers, &config.request.cache_buster);
    Ok(key.as_str().to_string())
}

pub(crate) fn describe_agent(user_agent: &str) -> Result<String> {
    let ua = UserAgent::parse(user_agent);
    let mut value = serde_json::to_value(&ua).context("failed to serialize the user agent")?;
    value["is_recording_available"] = json!(ua.is_recording_available());
    value["is_livestreaming_available"] = json!(ua.is_livestreaming_available());
    serde_json::to_string_pretty(&value).context("failed to render the user agent")
}

pub(crate) async fn poll(mut config: JsuConfig, url: String, interval_ms: Option<u64>, count: Option<u32>) -> Result<()> {
    if let Some(interval_ms) = interval_ms {
        config.poll.interval_ms = interval_ms;
    }
    let interval = config.poll_interval().max(Duration::from_millis(1));
    let toolkit = toolkit(config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Arc::clone(toolkit.client());
    let page = PageVisibility::default();
    let poller = PollingManager::new(
        move |completion| {
            let client = Arc::clone(&client);
            let url = url.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let reply = client.send_json(Request::get(url)).await;
                let _ = tx.send(reply);
                completion.done();
            });
        },
        interval,
        true,
        page.subscribe(),
    )
    .context("failed to start polling")?;

    let mut runs = 0;
    while let Some(reply) = rx.recv().await {
        runs += 1;
        match reply.error() {
            Some(error) if reply.status == 0 => warn!(%error, "poll request failed"),
            _ => println!("{} {}", reply.status, reply.body),
        }
        if count.is_some_and(|count| runs >= count) {
            break;
        }
    }
    drop(poller);
    Ok(())
}

pub(crate) fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(())
}
