use std::path::Path;

/// Mono 32-bit float WAV at 8 Hz (125 ms per sample).
pub fn write_test_wav(path: &Path, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    write_samples(path, spec, samples.iter().copied());
}

/// Interleaved 16-bit PCM WAV.
pub fn write_pcm16_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    write_samples(path, spec, samples.iter().copied());
}

fn write_samples<S: hound::Sample>(
    path: &Path,
    spec: hound::WavSpec,
    samples: impl Iterator<Item = S>,
) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}
