mod support;

use std::rc::Rc;
use std::time::{Duration, Instant};

use egui::Color32;
use hivewave::{
    app_dirs, config,
    egui_app::{
        controller::{WaveformController, interaction::InteractionPhase},
        ui::EguiPointerCapture,
    },
};
use support::{env::ConfigHomeGuard, wav::write_test_wav};
use tempfile::tempdir;

fn wait_for_envelope(controller: &mut WaveformController) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while controller.is_loading() {
        controller.poll_loader();
        assert!(Instant::now() < deadline, "envelope never arrived");
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn settings_survive_a_restart() {
    let temp = tempdir().unwrap();
    let _env = ConfigHomeGuard::set(temp.path().join("config"));
    let wav = temp.path().join("loop.wav");
    write_test_wav(&wav, &[0.2, -0.4, 0.6, -0.8]);

    let settings = config::load_or_default().unwrap();
    assert_eq!(settings, config::AppSettings::default());

    let capture = Rc::new(EguiPointerCapture::default());
    let mut controller = WaveformController::new(settings, None, capture);
    controller.resize(4, 16);
    controller.select(Some(wav.clone()));
    controller.set_waveform_color(Color32::from_rgb(0x33, 0x66, 0x99));
    wait_for_envelope(&mut controller);
    assert_eq!(controller.envelope().unwrap().len(), 4);
    controller.save_settings().unwrap();

    let settings_file = app_dirs::app_root_dir()
        .unwrap()
        .join(config::SETTINGS_FILE_NAME);
    assert!(settings_file.starts_with(temp.path()));
    let text = std::fs::read_to_string(&settings_file).unwrap();
    assert!(text.contains("#336699"), "{text}");

    let reloaded = config::load_or_default().unwrap();
    assert_eq!(reloaded.last_selected, Some(wav));
    assert_eq!(
        reloaded.waveform.color.to_color32(),
        Color32::from_rgb(0x33, 0x66, 0x99)
    );
}

#[test]
fn drag_without_audio_output_is_harmless() {
    let temp = tempdir().unwrap();
    let wav = temp.path().join("tone.wav");
    write_test_wav(&wav, &[0.5; 16]);
    let capture = Rc::new(EguiPointerCapture::default());
    let mut controller =
        WaveformController::new(config::AppSettings::default(), None, capture.clone());
    controller.resize(200, 40);
    controller.select(Some(wav));

    controller.pointer_moved(1.0, 2.0);
    assert_eq!(controller.phase(), InteractionPhase::Hovering);
    assert!(controller.pointer_pressed(1.0));
    assert!(capture.is_held());
    assert_eq!(controller.pointer_released(100.0), None);
    assert!(!capture.is_held());
    assert_eq!(controller.playhead_x(), 0.0);

    wait_for_envelope(&mut controller);
    let image = controller.bitmap().unwrap();
    assert_eq!(image.size, [200, 40]);
}
