use std::collections::{BTreeMap, BTreeSet};

use crate::api::endpoints;
use crate::config::ClientConfig;
use crate::types::{CreateLongExposureImageRequest, Frame};

pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Number of frames the backend extracts from a video of `duration_secs` at `fps`.
pub fn frame_count(duration_secs: f64, fps: u32) -> u32 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 || fps == 0 {
        return 0;
    }
    let count = (duration_secs * fps as f64).round();
    (count as u32).max(1)
}

/// `mm:ss.mmm`; minutes keep counting past 59.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, secs, millis)
}

/// Frames for a project, numbered from 1 like the extracted thumbnails.
pub fn build_frames(config: &ClientConfig, project_id: &str, fps: u32, duration_secs: f64) -> Vec<Frame> {
    (1..=frame_count(duration_secs, fps))
        .map(|frame_number| Frame {
            src: config.resolve(&endpoints::frame_thumbnail(project_id, frame_number)),
            frame_number,
            time: format_timestamp((frame_number - 1) as f64 / fps as f64),
            weight: DEFAULT_WEIGHT,
        })
        .collect()
}

/// Request for the selected frames. Frames weighted zero or less contribute nothing and are left out.
pub fn selection_request(frames: &[Frame], selected: &BTreeSet<u32>) -> CreateLongExposureImageRequest {
    CreateLongExposureImageRequest::from_frames(
        frames
            .iter()
            .filter(|f| selected.contains(&f.frame_number) && f.weight > 0.0),
    )
}

/// Frames with edited weights applied; frames without an edit keep their weight.
pub fn apply_weights(frames: &[Frame], weights: &BTreeMap<u32, f32>) -> Vec<Frame> {
    frames
        .iter()
        .map(|frame| match weights.get(&frame.frame_number) {
            Some(weight) => Frame {
                weight: *weight,
                ..frame.clone()
            },
            None => frame.clone(),
        })
        .collect()
}

/// Parse a weight typed into the editor. Empty or invalid input is rejected.
pub fn parse_weight(input: &str) -> Option<f32> {
    input
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:8080").unwrap()
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(10.0, 2), 20);
        assert_eq!(frame_count(0.2, 1), 1);
        assert_eq!(frame_count(0.0, 5), 0);
        assert_eq!(frame_count(f64::NAN, 5), 0);
        assert_eq!(frame_count(f64::INFINITY, 5), 0);
        assert_eq!(frame_count(12.0, 0), 0);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00.000");
        assert_eq!(format_timestamp(1.5), "00:01.500");
        assert_eq!(format_timestamp(61.25), "01:01.250");
        assert_eq!(format_timestamp(3600.0), "60:00.000");
    }

    #[test]
    fn test_build_frames() {
        let frames = build_frames(&config(), "abc", 4, 1.0);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].frame_number, 1);
        assert_eq!(frames[0].time, "00:00.000");
        assert_eq!(frames[3].time, "00:00.750");
        assert_eq!(
            frames[2].src,
            "http://localhost:8080/outputs/abc/frames/ffout_thumbnail_0003.webp"
        );
        assert!(frames.iter().all(|f| f.weight == DEFAULT_WEIGHT));
    }

    #[test]
    fn test_selection_request_keeps_selected_positive_weights() {
        let mut frames = build_frames(&config(), "abc", 1, 5.0);
        frames[1].weight = 2.5;
        frames[3].weight = 0.0;
        let selected: BTreeSet<u32> = [2, 4, 5].into_iter().collect();

        let request = selection_request(&frames, &selected);
        let numbers: Vec<u32> = request.frames_to_include.iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, vec![2, 5]);
        assert_eq!(request.frames_to_include[0].frame_weight, 2.5);
        assert!(request.project_id.is_none());
    }

    #[test]
    fn test_apply_weights() {
        let frames = build_frames(&config(), "abc", 1, 3.0);
        let weights: BTreeMap<u32, f32> = [(2, 0.25)].into_iter().collect();

        let weighted = apply_weights(&frames, &weights);
        assert_eq!(weighted[0].weight, DEFAULT_WEIGHT);
        assert_eq!(weighted[1].weight, 0.25);
        assert_eq!(weighted[1].src, frames[1].src);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(" 0.75 "), Some(0.75));
        assert_eq!(parse_weight("0"), Some(0.0));
        assert_eq!(parse_weight("-1"), None);
        assert_eq!(parse_weight("abc"), None);
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("NaN"), None);
    }
}
