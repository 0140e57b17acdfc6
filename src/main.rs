use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use triggerdispatch::behavior::DragBehavior;
use triggerdispatch::controller::{Axis, ComponentId, GilrsBackend};
use triggerdispatch::platform::{HeadlessAdapter, PlatformAdapter, WindowKind};
use triggerdispatch::{Behavior, InputConfig, InputHandler};

/// Logs the camera drag it receives
struct MouseControl;

impl DragBehavior for MouseControl {
    fn init(&self, x: i32, y: i32) {
        info!("mouse_control: grab at {},{}", x, y);
    }

    fn drag(&self, x: i32, y: i32) {
        debug!("mouse_control: drag to {},{}", x, y);
    }

    fn end(&self, x: i32, y: i32) {
        info!("mouse_control: release at {},{}", x, y);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_path = InputConfig::default_path();
    let config = InputConfig::load_or_default(&config_path)
        .map_err(|e| eyre!("Failed to load input config: {}", e))?;

    let handler = InputHandler::from_config(&config)
        .map_err(|e| eyre!("Invalid binding in {}: {}", config_path.display(), e))?;
    register_behaviors(&handler);
    info!("Registered behaviors: {:?}", handler.all_behaviors());

    let mut adapter = handler
        .attach::<HeadlessAdapter>(WindowKind::Headless)
        .map_err(|e| eyre!("Failed to attach adapter: {}", e))?;

    // Controller thread shares the lookup lists of the attached dispatcher
    match GilrsBackend::new() {
        Ok(backend) => {
            handler
                .start_controller(adapter.dispatcher(), Box::new(backend))
                .map_err(|e| eyre!("Failed to start controller poller: {}", e))?;
        }
        Err(e) => warn!("Continuing without controller support: {}", e),
    }

    run_demo_script(&mut adapter).map_err(|e| eyre!("Dispatch failed: {}", e))?;

    info!("Waiting for gamepad input, press Ctrl+C to exit");
    tokio::signal::ctrl_c().await?;

    handler
        .close()
        .map_err(|e| eyre!("Failed to stop controller poller: {}", e))?;

    info!("Shut down cleanly");
    Ok(())
}

fn register_behaviors(handler: &InputHandler) {
    handler.add_behavior("mouse_control", Behavior::drag(MouseControl));
    handler.add_behavior(
        "scroll1",
        Behavior::scroll(|amount: f64, horizontal: bool, x: i32, y: i32| {
            info!(
                "scroll1: {} {} at {},{}",
                if horizontal { "horizontal" } else { "vertical" },
                amount,
                x,
                y
            );
        }),
    );

    let axes = vec![
        ComponentId::Axis(Axis::X),
        ComponentId::Axis(Axis::Y),
        ComponentId::Axis(Axis::RX),
        ComponentId::Axis(Axis::RY),
    ];
    handler.add_behavior(
        "gamepad_movement_control",
        Behavior::gamepad_fn(axes, |axis, value| {
            info!("gamepad_movement_control: {} = {:.3}", axis, value);
        }),
    );

    let clicks = [
        "move_forward",
        "move_left",
        "move_back",
        "move_right",
        "move_forward_fast",
        "move_left_fast",
        "move_back_fast",
        "move_right_fast",
        "move_up",
        "move_down",
        "set_rendering_quality",
        "toggle_debug",
        "toggle_fullscreen",
        "screenshot",
        "record_movie",
        "toggle_vr",
    ];
    for name in clicks {
        handler.add_behavior(
            name,
            Behavior::click(move |x: i32, y: i32| info!("{} at {},{}", name, x, y)),
        );
    }

    for name in ["gamepad_screenshot", "gamepad_toggle_debug"] {
        handler.add_behavior(
            name,
            Behavior::gamepad_click(move |_: i32, _: i32| info!("{} from controller", name)),
        );
    }
}

/// A few synthetic inputs so the bindings can be seen working without a window
fn run_demo_script(
    adapter: &mut HeadlessAdapter,
) -> Result<(), triggerdispatch::DispatchError> {
    use triggerdispatch::platform::headless::MouseButton;
    use triggerdispatch::trigger::KeyCode;

    adapter.move_to(100, 100)?;
    adapter.tap_key(egui::Key::W)?;

    adapter.press_key(KeyCode::Shift)?;
    adapter.tap_key(egui::Key::W)?;
    adapter.release_key(KeyCode::Shift)?;

    adapter.press_button(MouseButton::Primary)?;
    adapter.move_to(120, 90)?;
    adapter.release_button(MouseButton::Primary)?;

    adapter.scroll(0.0, 3.0)?;

    let rebuilds = adapter.dispatcher().rebuild_count();
    debug!("Demo script done after {} lookup rebuilds", rebuilds);
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
