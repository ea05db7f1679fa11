mod support;

use hivewave::waveform::{
    self, DecodeError, ViewportState, WaveformBitmapCache, WaveformRenderer,
    playhead::{pixel_to_time, time_to_pixel},
};
use support::wav::{write_pcm16_wav, write_test_wav};
use tempfile::tempdir;

const FG: egui::Color32 = egui::Color32::from_rgb(250, 246, 240);
const BG: egui::Color32 = egui::Color32::from_rgb(18, 16, 14);

#[test]
fn file_to_bitmap_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.wav");
    write_test_wav(&path, &[0.0, 1.0, 0.0, -1.0]);

    let buffer = waveform::load_audio_buffer(&path).unwrap();
    assert_eq!(buffer.frame_count(), 4);
    assert_eq!(buffer.duration_ms(), 500.0);

    let envelope = waveform::downsample(&buffer, 4);
    assert_eq!(envelope.values(), &[0.0, 1.0, 0.0, -1.0]);

    let renderer = WaveformRenderer::new(BG);
    let viewport = ViewportState {
        width: 4,
        height: 11,
        color: FG,
    };
    let mut cache = WaveformBitmapCache::new();
    let key = viewport.render_key(&envelope);
    let image = cache.get_or_render(&renderer, &envelope, key);
    assert_eq!(image.size, [4, 11]);
    // Full-scale column reaches both edges.
    assert_eq!(image.pixels[1], FG);
    assert_eq!(image.pixels[10 * 4 + 1], FG);
    cache.get_or_render(&renderer, &envelope, key);
    assert_eq!(cache.render_count(), 1);
}

#[test]
fn stereo_pcm_folds_and_keeps_length() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    let frames: Vec<i16> = (0..1_000)
        .flat_map(|i| {
            let left = if i % 2 == 0 { 16_384 } else { -16_384 };
            [left, 0]
        })
        .collect();
    write_pcm16_wav(&path, 2, 44_100, &frames);

    let buffer = waveform::load_audio_buffer(&path).unwrap();
    assert_eq!(buffer.channels(), 2);
    assert_eq!(buffer.frame_count(), 1_000);

    for width in [0usize, 1, 7, 333, 1_000, 2_500] {
        let envelope = waveform::downsample(&buffer, width);
        assert_eq!(envelope.len(), width);
        for &value in envelope.values() {
            assert!((-1.0..=1.0).contains(&value));
            assert!((value.abs() - 0.25).abs() < 1e-3, "value {value}");
        }
    }
}

#[test]
fn decode_failures_are_typed() {
    let dir = tempdir().unwrap();
    let missing = waveform::load_audio_buffer(&dir.path().join("nope.wav")).unwrap_err();
    assert!(missing.is_missing());

    let junk = dir.path().join("junk.mp3");
    std::fs::write(&junk, [0u8; 64]).unwrap();
    assert!(matches!(
        waveform::load_audio_buffer(&junk),
        Err(DecodeError::Unsupported { .. } | DecodeError::Empty { .. })
    ));
}

#[test]
fn playhead_mapping_round_trips() {
    let duration = 183_250.0;
    let width = 1_237.0;
    for step in 0..=50 {
        let position = duration * step as f64 / 50.0;
        let x = time_to_pixel(position, duration, width);
        let back = pixel_to_time(x, width, duration);
        assert!((back - position).abs() <= duration * 1e-6, "{position} -> {back}");
    }
    assert_eq!(time_to_pixel(5_000.0, 0.0, width), 0.0);
    assert_eq!(pixel_to_time(10.0, 0.0, duration), 0.0);
}
