use std::sync::Arc;
use std::thread;
use std::time::Duration;

use newengine_input::keymap::{native_button, native_mod};
use newengine_input::IVec2;
use newengine_window::{
    CloseHandle, HeadlessSystem, NativeWindowId, Window, WindowConfig, WindowEventKind,
    WindowSystem,
};

const CONFIG_PATH: &str = "window.toml";
const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = WindowConfig::load_or_default(&path)?;
    log::info!(
        "demo: '{}' {}x{} threaded={} limit_poll_rate={}",
        config.title,
        config.width,
        config.height,
        config.threaded,
        config.limit_poll_rate
    );

    let native = Arc::new(HeadlessSystem::new());
    let mut window = Window::create(WindowSystem::new(native.clone()), &config)?;
    let id = window
        .native_id()
        .ok_or_else(|| anyhow::anyhow!("window has no native id"))?;

    install_ctrlc(window.close_handle())?;
    wire_notifications(&window);

    let feeder = thread::Builder::new()
        .name("demo-feeder".into())
        .spawn(move || feed_script(&native, id))?;

    let mut frame = 0u64;
    while window.exists() {
        let snap = window.pump_events();
        if !snap.is_quiet() {
            let text: String = snap.key_char_presses().iter().collect();
            log::info!(
                "demo: frame {} keys={} buttons={} text={:?} wheel={:.2} mouse=({:.0}, {:.0})",
                frame,
                snap.key_events().len(),
                snap.mouse_events().len(),
                text,
                snap.wheel_delta(),
                snap.mouse_position().x,
                snap.mouse_position().y
            );
        }
        let delta = window.mouse_delta();
        if delta != newengine_input::Vec2::ZERO {
            log::debug!("demo: frame {} mouse delta ({}, {})", frame, delta.x, delta.y);
        }

        frame += 1;
        thread::sleep(FRAME);
    }

    if feeder.join().is_err() {
        log::warn!("demo: feeder thread panicked");
    }
    log::info!("demo: window gone after {} frames", frame);
    Ok(())
}

fn install_ctrlc(handle: CloseHandle) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        log::info!("demo: ctrl-c, closing window");
        handle.request();
    })?;
    Ok(())
}

fn wire_notifications(window: &Window) {
    let ev = window.events();
    ev.closing.connect(|_| log::info!("demo: closing"));
    ev.closed.connect(|_| log::info!("demo: closed"));
    ev.resized.connect(|_| log::info!("demo: resized"));
    ev.moved.connect(|p| log::info!("demo: moved to ({}, {})", p.x, p.y));
    ev.key_down.connect(|k| log::debug!("demo: key down {:?} {:?}", k.key, k.modifiers));
    ev.mouse_down.connect(|m| log::debug!("demo: mouse down {:?}", m.button));
    ev.drag_drop.connect(|d| log::info!("demo: dropped {}", d.path.display()));
}

/// Scripted stand-in for a user at the keyboard.
fn feed_script(native: &HeadlessSystem, id: NativeWindowId) {
    let step = || thread::sleep(FRAME * 3);

    for i in 0..8 {
        native.push_mouse_motion(id, IVec2::new(100 + i * 12, 80 + i * 5));
        step();
    }

    native.push_mouse_button(id, native_button::LEFT, true);
    native.push_mouse_button(id, native_button::LEFT, false);
    step();

    // H, I with left shift held, then the text those keys produce.
    native.push_key(id, 11, true, native_mod::LSHIFT);
    native.push_key(id, 11, false, native_mod::LSHIFT);
    native.push_key(id, 12, true, 0);
    native.push_key(id, 12, false, 0);
    native.push_text(id, "Hi");
    step();

    native.push_wheel(id, 1.0);
    native.push_wheel(id, -0.25);
    step();

    native.push_drop_file(id, "assets/scene.toml");
    native.push_window_event(id, WindowEventKind::FocusLost);
    step();

    native.push_window_event(id, WindowEventKind::Close);
}
