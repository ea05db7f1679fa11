use crate::waveform::{AudioBuffer, DecodeError, WaveformEnvelope, downsample, load_audio_buffer};
use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

pub(crate) struct EnvelopeJob {
    pub request_id: u64,
    pub path: PathBuf,
    pub width: usize,
}

#[derive(Debug)]
pub(crate) struct EnvelopeOutcome {
    pub envelope: WaveformEnvelope,
    pub channels: u16,
    pub sample_rate: u32,
    pub duration_ms: f64,
}

pub(crate) struct EnvelopeResult {
    pub request_id: u64,
    pub path: PathBuf,
    pub width: usize,
    pub result: Result<EnvelopeOutcome, DecodeError>,
}

/// Decode and downsample on a background thread.
///
/// Jobs queued while one is running are coalesced: only the newest is processed.
pub(crate) fn spawn_envelope_loader() -> (Sender<EnvelopeJob>, Receiver<EnvelopeResult>) {
    let (tx, rx) = std::sync::mpsc::channel::<EnvelopeJob>();
    let (result_tx, result_rx) = std::sync::mpsc::channel::<EnvelopeResult>();
    let spawned = thread::Builder::new()
        .name("hivewave-envelope".into())
        .spawn(move || {
            while let Ok(job) = rx.recv() {
                let job = newest_job(job, &rx);
                let result = load_envelope(&job);
                let sent = result_tx.send(EnvelopeResult {
                    request_id: job.request_id,
                    path: job.path,
                    width: job.width,
                    result,
                });
                if sent.is_err() {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        tracing::error!("Failed to start envelope loader thread: {err}");
    }
    (tx, result_rx)
}

fn newest_job(mut job: EnvelopeJob, rx: &Receiver<EnvelopeJob>) -> EnvelopeJob {
    while let Ok(next) = rx.try_recv() {
        tracing::trace!("Skipping superseded envelope request {}", job.request_id);
        job = next;
    }
    job
}

fn load_envelope(job: &EnvelopeJob) -> Result<EnvelopeOutcome, DecodeError> {
    let buffer = load_audio_buffer(&job.path)?;
    Ok(outcome_from_buffer(&buffer, job.width))
}

pub(crate) fn outcome_from_buffer(buffer: &AudioBuffer, width: usize) -> EnvelopeOutcome {
    EnvelopeOutcome {
        envelope: downsample(buffer, width),
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        duration_ms: buffer.duration_ms(),
    }
}
