//! yt-dlp command-line construction.

use std::ffi::OsString;
use std::path::PathBuf;

use vidgrab_core::{Container, DownloadRequest, Quality};

use crate::settings::DownloaderSettings;

/// Format selector and re-encode arguments for one quality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatProfile {
    /// Value for `-f`.
    pub selector: String,
    /// ffmpeg arguments for `--postprocessor-args`, if the output is re-encoded.
    pub postprocessor_args: Option<String>,
}

impl FormatProfile {
    pub fn for_quality(quality: Quality) -> Self {
        if quality.is_audio() {
            return Self {
                selector: "bestaudio/best".to_string(),
                postprocessor_args: None,
            };
        }

        let selector = quality.max_height().map_or_else(
            || "bestvideo[vcodec^=avc1]+bestaudio[ext=m4a]/bestvideo+bestaudio/best".to_string(),
            |h| {
                format!(
                    "bestvideo[height<={h}][vcodec^=avc1]+bestaudio[ext=m4a]/\
                     bestvideo[height<={h}]+bestaudio/best[height<={h}]"
                )
            },
        );

        let (crf, audio_bitrate) = match quality {
            Quality::P720 => (23, "128k"),
            Quality::P480 => (25, "96k"),
            _ => (23, "192k"),
        };
        let scale = quality
            .max_height()
            .map(|h| format!(" -vf scale=-2:{h}"))
            .unwrap_or_default();

        Self {
            selector,
            postprocessor_args: Some(format!(
                "ffmpeg:-c:v libx264 -preset ultrafast -crf {crf}{scale} -c:a aac -b:a {audio_bitrate}"
            )),
        }
    }
}

/// Escape yt-dlp template syntax in literal text.
fn escape_template(text: &str) -> String {
    text.replace('%', "%%")
}

/// Output path template: `<downloads_dir>/<base>.<ext>`.
pub fn output_template(settings: &DownloaderSettings, request: &DownloadRequest) -> PathBuf {
    let stem = request.custom_filename.as_deref().map_or_else(
        || "%(title)s".to_string(),
        escape_template,
    );
    let ext = if request.quality.is_audio() {
        Container::Mp3.extension()
    } else {
        "%(ext)s"
    };

    settings
        .downloads_dir
        .join(format!("{stem}{}.{ext}", request.quality.suffix()))
}

/// Full argument list for one download, launcher prefix included.
///
/// The request is expected to be validated; the URL is always last and
/// preceded by `--`.
pub fn build_args(settings: &DownloaderSettings, request: &DownloadRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = settings.launcher.prefix_args();
    let mut push = |arg: &str| args.push(OsString::from(arg));

    push("--newline");
    push("--progress");
    push("--no-warnings");

    let profile = FormatProfile::for_quality(request.quality);
    push("-f");
    push(&profile.selector);

    if request.quality.is_audio() {
        push("-x");
        push("--audio-format");
        push("mp3");
        push("--audio-quality");
        push("0");
    } else {
        push("--merge-output-format");
        push(request.container.extension());
        if request.container != Container::Webm {
            if let Some(pp) = &profile.postprocessor_args {
                push("--postprocessor-args");
                push(pp);
            }
        }
    }

    if let Some(ffmpeg) = &settings.ffmpeg_location {
        args.push("--ffmpeg-location".into());
        args.push(ffmpeg.clone().into_os_string());
    }

    args.push("-o".into());
    args.push(output_template(settings, request).into_os_string());

    for flag in [
        "--no-playlist",
        "--restrict-filenames",
        "--no-simulate",
        "--print",
        "after_move:filepath",
        "--force-overwrites",
        "--no-cache-dir",
    ] {
        args.push(flag.into());
    }

    push_network_args(settings, &mut args);

    if request.subtitles {
        args.push("--write-subs".into());
        args.push("--sub-langs".into());
        args.push(settings.subtitle_language.clone().into());
        args.push("--embed-subs".into());
    }

    args.extend(settings.extra_args.iter().map(OsString::from));

    args.push("--".into());
    args.push(request.url.clone().into());
    args
}

fn push_network_args(settings: &DownloaderSettings, args: &mut Vec<OsString>) {
    let net = &settings.network;
    let mut pair = |flag: &str, value: String| {
        args.push(flag.into());
        args.push(value.into());
    };

    pair("--retries", net.retries.to_string());
    pair("--fragment-retries", net.fragment_retries.to_string());
    pair("--extractor-retries", net.extractor_retries.to_string());
    if net.sleep_requests > 0.0 {
        pair("--sleep-requests", net.sleep_requests.to_string());
    }
    if net.sleep_interval > 0 {
        pair("--sleep-interval", net.sleep_interval.to_string());
        pair(
            "--max-sleep-interval",
            net.max_sleep_interval.max(net.sleep_interval).to_string(),
        );
    }
    if let Some(runtime) = &net.js_runtime {
        pair("--js-runtimes", runtime.clone());
    }
    if let Some(extractor_args) = &net.extractor_args {
        pair("--extractor-args", extractor_args.clone());
    }
    if let Some(ua) = &net.user_agent {
        pair("--user-agent", ua.clone());
    }
    for header in &net.headers {
        pair("--add-header", header.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Launcher, NetworkPolicy};

    fn settings() -> DownloaderSettings {
        DownloaderSettings::new("/srv/downloads")
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn value_after(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    }

    #[test]
    fn best_profile_prefers_h264() {
        let profile = FormatProfile::for_quality(Quality::Best);
        assert_eq!(
            profile.selector,
            "bestvideo[vcodec^=avc1]+bestaudio[ext=m4a]/bestvideo+bestaudio/best"
        );
        assert_eq!(
            profile.postprocessor_args.as_deref(),
            Some("ffmpeg:-c:v libx264 -preset ultrafast -crf 23 -c:a aac -b:a 192k")
        );
    }

    #[test]
    fn capped_profiles_scale_and_lower_bitrate() {
        let p720 = FormatProfile::for_quality(Quality::P720);
        assert_eq!(
            p720.selector,
            "bestvideo[height<=720][vcodec^=avc1]+bestaudio[ext=m4a]/bestvideo[height<=720]+bestaudio/best[height<=720]"
        );
        assert_eq!(
            p720.postprocessor_args.as_deref(),
            Some("ffmpeg:-c:v libx264 -preset ultrafast -crf 23 -vf scale=-2:720 -c:a aac -b:a 128k")
        );

        let p480 = FormatProfile::for_quality(Quality::P480);
        assert_eq!(
            p480.postprocessor_args.as_deref(),
            Some("ffmpeg:-c:v libx264 -preset ultrafast -crf 25 -vf scale=-2:480 -c:a aac -b:a 96k")
        );

        let p1080 = FormatProfile::for_quality(Quality::P1080);
        assert!(p1080.postprocessor_args.unwrap().ends_with("scale=-2:1080 -c:a aac -b:a 192k"));
    }

    #[test]
    fn audio_profile_has_no_reencode() {
        let profile = FormatProfile::for_quality(Quality::Audio);
        assert_eq!(profile.selector, "bestaudio/best");
        assert!(profile.postprocessor_args.is_none());
    }

    #[test]
    fn template_uses_title_and_suffix() {
        let request = DownloadRequest::new("https://example.com/v").with_quality(Quality::P720);
        assert_eq!(
            output_template(&settings(), &request),
            PathBuf::from("/srv/downloads/%(title)s_720p.%(ext)s")
        );
    }

    #[test]
    fn template_escapes_percent_in_custom_name() {
        let request = DownloadRequest::new("https://example.com/v")
            .with_quality(Quality::Audio)
            .with_custom_filename(Some("100% mix".to_string()));
        assert_eq!(
            output_template(&settings(), &request),
            PathBuf::from("/srv/downloads/100%% mix_audio.mp3")
        );
    }

    #[test]
    fn video_args_merge_and_reencode() {
        let request = DownloadRequest::new("https://example.com/v").with_quality(Quality::P1080);
        let args = strings(&build_args(&settings(), &request));

        assert_eq!(&args[..2], ["-m", "yt_dlp"]);
        assert_eq!(value_after(&args, "--merge-output-format").as_deref(), Some("mp4"));
        assert!(value_after(&args, "--postprocessor-args").is_some());
        assert_eq!(value_after(&args, "--print").as_deref(), Some("after_move:filepath"));
        assert!(args.contains(&"--no-simulate".to_string()));
        assert!(!args.contains(&"-x".to_string()));
        assert_eq!(&args[args.len() - 2..], ["--", "https://example.com/v"]);
    }

    #[test]
    fn webm_skips_h264_reencode() {
        let request = DownloadRequest::new("https://example.com/v").with_container(Container::Webm);
        let args = strings(&build_args(&settings(), &request));

        assert_eq!(value_after(&args, "--merge-output-format").as_deref(), Some("webm"));
        assert!(!args.contains(&"--postprocessor-args".to_string()));
    }

    #[test]
    fn audio_args_extract_mp3() {
        let request = DownloadRequest::new("https://example.com/a")
            .with_quality(Quality::Audio)
            .with_container(Container::Mp3);
        let args = strings(&build_args(&settings(), &request));

        assert_eq!(value_after(&args, "--audio-format").as_deref(), Some("mp3"));
        assert_eq!(value_after(&args, "--audio-quality").as_deref(), Some("0"));
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn network_policy_is_applied() {
        let request = DownloadRequest::new("https://example.com/v");
        let args = strings(&build_args(&settings(), &request));

        assert_eq!(value_after(&args, "--retries").as_deref(), Some("10"));
        assert_eq!(value_after(&args, "--sleep-requests").as_deref(), Some("1.5"));
        assert_eq!(value_after(&args, "--max-sleep-interval").as_deref(), Some("6"));
        assert_eq!(value_after(&args, "--js-runtimes").as_deref(), Some("node"));
        assert_eq!(args.iter().filter(|a| *a == "--add-header").count(), 2);
    }

    #[test]
    fn minimal_policy_drops_pacing_and_identity() {
        let settings = settings()
            .with_network(NetworkPolicy::minimal())
            .with_launcher(Launcher::Binary {
                path: PathBuf::from("yt-dlp"),
            });
        let args = strings(&build_args(&settings, &DownloadRequest::new("https://example.com/v")));

        assert_eq!(args[0], "--newline");
        assert!(!args.contains(&"--sleep-requests".to_string()));
        assert!(!args.contains(&"--user-agent".to_string()));
        assert_eq!(value_after(&args, "--retries").as_deref(), Some("0"));
    }

    #[test]
    fn subtitles_and_ffmpeg_location() {
        let settings = settings().with_ffmpeg_location(Some(PathBuf::from("/opt/ffmpeg/bin")));
        let request = DownloadRequest::new("https://example.com/v").with_subtitles(true);
        let args = strings(&build_args(&settings, &request));

        assert_eq!(value_after(&args, "--ffmpeg-location").as_deref(), Some("/opt/ffmpeg/bin"));
        assert_eq!(value_after(&args, "--sub-langs").as_deref(), Some("en"));
        assert!(args.contains(&"--embed-subs".to_string()));
    }

    #[test]
    fn extra_args_precede_url() {
        let mut settings = settings();
        settings.extra_args = vec!["--cookies".to_string(), "/tmp/c.txt".to_string()];
        let args = strings(&build_args(&settings, &DownloadRequest::new("https://example.com/v")));

        let n = args.len();
        assert_eq!(&args[n - 4..], ["--cookies", "/tmp/c.txt", "--", "https://example.com/v"]);
    }
}
