//! Stream probing with ffprobe and `cropdetect`.
//!
//! ffprobe decodes the whole file through a lavfi `movie=...,cropdetect`
//! source and reports the crop suggestion of every sampled frame as packet
//! tags, next to the stream descriptors.

use std::collections::HashMap;
use std::path::Path;

use pipcast_common::error::{PipcastError, PipcastResult};
use pipcast_processing_core::crop::{determine_crop_area, merge_crop_samples, CropSample};
use pipcast_recording_model::{Rectangle, VideoProperties};
use serde::Deserialize;

use crate::runner::{ToolInvocation, ToolRunner};

const TAG_LEFT: &str = "lavfi.cropdetect.x1";
const TAG_TOP: &str = "lavfi.cropdetect.y1";
const TAG_RIGHT: &str = "lavfi.cropdetect.x2";
const TAG_BOTTOM: &str = "lavfi.cropdetect.y2";

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    packets: Vec<ProbePacket>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProbePacket {
    #[serde(default)]
    tags: Option<HashMap<String, String>>,
}

/// Raw probe result, before crop resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbedStream {
    pub width: u32,
    pub height: u32,
    /// Most permissive box over all crop samples.
    pub raw_crop: Rectangle,
    /// Number of frames that carried crop tags.
    pub samples: usize,
}

/// Build the ffprobe invocation for `path`.
pub fn probe_command(ffprobe: &str, path: &Path) -> ToolInvocation {
    ToolInvocation::new(ffprobe).args([
        "-print_format".to_string(),
        "json".to_string(),
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        format!("movie={},cropdetect", path.display()),
        "-show_streams".to_string(),
        "-show_entries".to_string(),
        format!("packet_tags={TAG_LEFT},{TAG_TOP},{TAG_RIGHT},{TAG_BOTTOM}"),
    ])
}

fn parse_tag(tags: &HashMap<String, String>, key: &str) -> PipcastResult<u32> {
    let value = tags
        .get(key)
        .ok_or_else(|| PipcastError::probe(format!("crop sample is missing {key}")))?;
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| PipcastError::probe(format!("invalid {key} value {value:?}")))?;
    Ok(parsed.clamp(0, i64::from(u32::MAX)) as u32)
}

fn crop_sample(tags: &HashMap<String, String>) -> PipcastResult<Option<CropSample>> {
    if ![TAG_LEFT, TAG_TOP, TAG_RIGHT, TAG_BOTTOM]
        .iter()
        .any(|key| tags.contains_key(*key))
    {
        return Ok(None);
    }
    Ok(Some(CropSample {
        left: parse_tag(tags, TAG_LEFT)?,
        top: parse_tag(tags, TAG_TOP)?,
        right: parse_tag(tags, TAG_RIGHT)?,
        bottom: parse_tag(tags, TAG_BOTTOM)?,
    }))
}

/// Parse ffprobe's JSON output.
pub fn parse_probe_output(stdout: &[u8]) -> PipcastResult<ProbedStream> {
    let info: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| PipcastError::probe(format!("unparseable ffprobe output: {e}")))?;

    // Recordings carry exactly one video stream.
    let video = info
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| PipcastError::probe("no video stream found"))?;

    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(PipcastError::probe("video stream has no dimensions")),
    };

    let mut samples = Vec::new();
    for packet in &info.packets {
        if let Some(tags) = &packet.tags {
            if let Some(sample) = crop_sample(tags)? {
                samples.push(sample);
            }
        }
    }

    Ok(ProbedStream {
        width,
        height,
        raw_crop: merge_crop_samples(width, height, &samples),
        samples: samples.len(),
    })
}

/// Probe `path` and resolve its effective crop area.
pub async fn video_properties<R: ToolRunner>(
    runner: &R,
    ffprobe: &str,
    path: &Path,
) -> PipcastResult<VideoProperties> {
    let command = probe_command(ffprobe, path);

    tracing::info!(path = %path.display(), "Analyzing stream");
    tracing::debug!(command = %command.command_line(), "Probe command");

    let stdout = runner.run(&command).await?;
    let probed = parse_probe_output(&stdout)?;
    let crop = determine_crop_area(probed.width, probed.height, probed.raw_crop);

    tracing::debug!(
        path = %path.display(),
        width = probed.width,
        height = probed.height,
        samples = probed.samples,
        raw_crop = ?probed.raw_crop,
        crop = ?crop,
        "Stream analyzed"
    );

    Ok(VideoProperties::new(probed.width, probed.height, crop))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = r#"{
        "packets": [
            { "tags": { "lavfi.cropdetect.x1": "130", "lavfi.cropdetect.y1": "60",
                        "lavfi.cropdetect.x2": "330", "lavfi.cropdetect.y2": "210" } },
            { },
            { "tags": { "lavfi.cropdetect.x1": "125", "lavfi.cropdetect.y1": "53",
                        "lavfi.cropdetect.x2": "341", "lavfi.cropdetect.y2": "222" } }
        ],
        "streams": [
            { "index": 0, "codec_type": "audio" },
            { "index": 1, "codec_type": "video", "width": 480, "height": 270 }
        ]
    }"#;

    #[test]
    fn test_probe_command() {
        let cmd = probe_command("ffprobe", Path::new("rec/stream/full.webm"));
        assert_eq!(cmd.program, "ffprobe");
        assert_eq!(
            cmd.args,
            vec![
                "-print_format",
                "json",
                "-f",
                "lavfi",
                "-i",
                "movie=rec/stream/full.webm,cropdetect",
                "-show_streams",
                "-show_entries",
                "packet_tags=lavfi.cropdetect.x1,lavfi.cropdetect.y1,lavfi.cropdetect.x2,lavfi.cropdetect.y2",
            ]
        );
    }

    #[test]
    fn test_parse_merges_samples() {
        let probed = parse_probe_output(SAMPLE_OUTPUT.as_bytes()).unwrap();
        assert_eq!(probed.width, 480);
        assert_eq!(probed.height, 270);
        assert_eq!(probed.samples, 2);
        assert_eq!(probed.raw_crop, Rectangle::new(217, 170, 125, 53));
    }

    #[test]
    fn test_parse_without_samples_is_full_frame() {
        let json = r#"{"streams":[{"codec_type":"video","width":1920,"height":1080}]}"#;
        let probed = parse_probe_output(json.as_bytes()).unwrap();
        assert_eq!(probed.samples, 0);
        assert_eq!(probed.raw_crop, Rectangle::full_frame(1920, 1080));
    }

    #[test]
    fn test_parse_rejects_missing_video() {
        let json = r#"{"streams":[{"codec_type":"audio"}],"packets":[]}"#;
        let err = parse_probe_output(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PipcastError::Probe { .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_probe_output(b"Invalid data found").is_err());

        let json = r#"{"streams":[{"codec_type":"video","width":64,"height":64}],
                      "packets":[{"tags":{"lavfi.cropdetect.x1":"abc"}}]}"#;
        assert!(parse_probe_output(json.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_clamps_negative_origin() {
        let json = r#"{"streams":[{"codec_type":"video","width":64,"height":64}],
                      "packets":[{"tags":{"lavfi.cropdetect.x1":"-2","lavfi.cropdetect.y1":"4",
                                          "lavfi.cropdetect.x2":"61","lavfi.cropdetect.y2":"59"}}]}"#;
        let probed = parse_probe_output(json.as_bytes()).unwrap();
        assert_eq!(probed.raw_crop, Rectangle::new(62, 56, 0, 4));
    }
}
