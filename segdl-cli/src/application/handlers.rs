use std::path::{Component, Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use segdl_core::config::Settings;
use segdl_core::error::{Result, SegdlError};
use segdl_core::util::size::format_size;
use segdl_grpc::{DownloadRequest, Orchestrator, connect, file_info};
use tokio_util::sync::CancellationToken;
use tracing::warn;

fn load_settings(config: &Path, server: Option<String>) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config)?;
    if let Some(addr) = server {
        settings.download_settings.server_address = addr;
    }
    Ok(settings)
}

/// Explicit count when it lies in `1..=max`, otherwise the server's recommendation.
fn choose_segments(requested: Option<u32>, max: u32, recommended: u32) -> u32 {
    match requested {
        Some(n) if (1..=max).contains(&n) => n,
        Some(n) => {
            eprintln!("segments must be between 1 and {max}; using {recommended}");
            warn!(requested = n, max, recommended, "segment count out of range");
            recommended.max(1)
        }
        None => recommended.max(1),
    }
}

/// Last component of a server-supplied name; never a directory or traversal.
fn local_file_name(name: &str) -> Result<String> {
    let normalized = name.replace('\\', "/");
    match Path::new(&normalized).components().next_back() {
        Some(Component::Normal(last)) => Ok(last.to_string_lossy().into_owned()),
        _ => Err(SegdlError::InvalidArgument(format!(
            "server sent unusable file name {name:?}"
        ))),
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    bar.set_style(style);
    bar
}

pub async fn handle_info(path: String, server: Option<String>, config: PathBuf) -> Result<()> {
    let settings = load_settings(&config, server)?;
    let client = connect(
        &settings.download_settings.server_address,
        settings.download_settings.max_message_bytes,
    )
    .await?;
    let info = file_info(&client, &path).await?;

    println!("name:      {}", info.file_name);
    println!(
        "size:      {} ({} bytes)",
        format_size(info.file_size as f64),
        info.file_size
    );
    println!("type:      {}", info.content_type);
    println!("segments:  {} recommended", info.recommended_segments);
    Ok(())
}

pub async fn handle_get(
    path: String,
    segments: Option<u32>,
    segment_size_mb: Option<u32>,
    out_dir: Option<PathBuf>,
    server: Option<String>,
    config: PathBuf,
    force: bool,
) -> Result<()> {
    let settings = load_settings(&config, server)?.download_settings;
    let segment_size_mb = segment_size_mb.unwrap_or(settings.segment_size_mb);
    let out_dir = out_dir.unwrap_or(settings.output_dir);

    let client = connect(&settings.server_address, settings.max_message_bytes).await?;
    let info = file_info(&client, &path).await?;
    let total_segments = choose_segments(
        segments,
        settings.max_segments,
        info.recommended_segments,
    );

    std::fs::create_dir_all(&out_dir)?;
    let destination = out_dir.join(local_file_name(&info.file_name)?);
    if force && destination.exists() {
        std::fs::remove_file(&destination)?;
    }

    eprintln!(
        "downloading {} ({}) in {} segment(s)",
        info.file_name,
        format_size(info.file_size as f64),
        total_segments
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let orchestrator = Orchestrator::new(client, segment_size_mb);
    let mut progress = orchestrator.subscribe();
    let bar = progress_bar(info.file_size);
    let request = DownloadRequest {
        file_id: info.file_id,
        total_segments,
        file_size: info.file_size,
        destination,
    };

    let download = orchestrator.download(request, cancel);
    tokio::pin!(download);
    let result = loop {
        tokio::select! {
            r = &mut download => break r,
            Ok(()) = progress.changed() => {
                bar.set_position(progress.borrow_and_update().bytes_written);
            }
        }
    };

    let completion = match result {
        Ok(c) => {
            bar.finish();
            c
        }
        Err(e) => {
            bar.abandon();
            return Err(e);
        }
    };

    println!(
        "downloaded {} in {:.2}s ({}/s)",
        format_size(completion.bytes as f64),
        completion.elapsed.as_secs_f64(),
        format_size(completion.bytes_per_second())
    );
    println!("saved to {}", completion.destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_in_range_is_kept() {
        assert_eq!(choose_segments(Some(1), 16, 4), 1);
        assert_eq!(choose_segments(Some(16), 16, 4), 16);
    }

    #[test]
    fn segment_count_out_of_range_uses_recommendation() {
        assert_eq!(choose_segments(Some(0), 16, 4), 4);
        assert_eq!(choose_segments(Some(17), 16, 8), 8);
        assert_eq!(choose_segments(None, 16, 2), 2);
    }

    #[test]
    fn file_name_is_reduced_to_last_component() {
        assert_eq!(local_file_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(local_file_name("a/b/c.bin").unwrap(), "c.bin");
        assert_eq!(local_file_name(r"..\..\evil.exe").unwrap(), "evil.exe");
        assert!(local_file_name("..").is_err());
        assert!(local_file_name("").is_err());
        assert!(local_file_name("/").is_err());
    }

    #[test]
    fn server_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("appsettings.json");
        std::fs::write(
            &config,
            r#"{"DownloadSettings": {"ServerAddress": "http://file:1", "SegmentSizeMB": 2}}"#,
        )
        .unwrap();

        let from_file = load_settings(&config, None).unwrap();
        assert_eq!(from_file.download_settings.server_address, "http://file:1");
        assert_eq!(from_file.download_settings.segment_size_mb, 2);

        let overridden = load_settings(&config, Some("http://flag:2".into())).unwrap();
        assert_eq!(overridden.download_settings.server_address, "http://flag:2");
    }

    #[test]
    fn missing_config_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(&dir.path().join("none.json"), None).unwrap();
        assert_eq!(s.download_settings.max_segments, 16);
    }
}
