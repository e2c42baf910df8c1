use eframe::egui;
use embassy_executor::Executor;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::PathBuf;
use std::thread;

mod control;
mod session;
mod ui;

use control::{RobotClient, TeleopConfig};
use session::{InputEvent, SessionContext};
use ui::{AppState, UIRefreshState};

const UI_REFRESH_QUEUE_SIZE: usize = 64;
pub type UIRefreshQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub type UIRefreshQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub type UIRefreshQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;

const INPUT_QUEUE_SIZE: usize = 64;
pub type InputQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_SIZE>;
pub type InputQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_SIZE>;
pub type InputQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_SIZE>;

fn main() {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("cozmo_teleop"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(control::config::DEFAULT_CONFIG_PATH));

    let config = match TeleopConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let transport = match RobotClient::new(&config) {
        Ok(transport) => transport,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let ui_refresh_channel: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
    let input_channel: &'static InputQueue = Box::leak(Box::new(InputQueue::new()));

    let ui_refresh_rx = ui_refresh_channel.receiver();
    let input_tx = input_channel.sender();
    let input_rx = input_channel.receiver();

    let ui_config = config.clone();
    let context: &'static SessionContext = Box::leak(Box::new(SessionContext::new(config, transport, ui_refresh_channel.sender())));

    // Spawn Embassy executor on a dedicated background thread
    let embassy_handle = thread::Builder::new().name("embassy-executor".to_string()).spawn(move || {
        // Leak the executor to satisfy the 'static lifetime required by run()
        let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
        executor.run(|spawner| session::start_session(spawner, context, input_rx));
    });
    if let Err(e) = embassy_handle {
        log::error!("Failed to spawn executor thread: {}", e);
        std::process::exit(1);
    }

    // Start the GUI on the main thread (required on macOS)
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Cozmo Teleop",
        native_options,
        Box::new(move |_cc| Ok(Box::new(AppState::new(ui_refresh_rx, input_tx, &ui_config)))),
    ) {
        log::error!("UI terminated with error: {}", e);
    }
}
