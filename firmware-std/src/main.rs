//! HandSwitch: ESP-IDF std bridge
//!
//! Receives hand landmark frames from a detector host over the serial
//! console and BLE, runs them through the gesture engine, and publishes
//! dispatched command codes to an MQTT broker. A single pipeline thread owns
//! the engine; transports only parse frames and queue them.

mod mqtt;

use std::io::Read;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use handswitch::{comm, defaults, protocol};

use comm::LineReader;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition};
use handswitch::config::{BridgeConfig, FrameConfig};
use handswitch::GestureEngine;
use mqtt::{MqttSink, MQTT_CONNECTED};
use protocol::{DeviceMessage, TimedFrame, MAX_MSG_LEN, VERSION};

use esp32_nimble::utilities::BleUuid;
use esp32_nimble::{BLEAdvertisementData, BLEDevice, NimbleProperties};

/// WiFi credentials, set at build time.
const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};
const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(pass) => pass,
    None => "",
};

const STATUS_INTERVAL: Duration = Duration::from_secs(30);

// ── Shared state ─────────────────────────────────────────────────────

static FRAMES: AtomicU32 = AtomicU32::new(0);
static HANDS: AtomicU32 = AtomicU32::new(0);
static SENT: AtomicU32 = AtomicU32::new(0);
static DROPPED: AtomicU32 = AtomicU32::new(0);
static PUBLISH_FAILED: AtomicU32 = AtomicU32::new(0);

/// Boot time, captured once in main. Used for uptime.
static BOOT_INSTANT: Mutex<Option<Instant>> = Mutex::new(None);

fn uptime_secs() -> u32 {
    BOOT_INSTANT
        .lock()
        .ok()
        .and_then(|i| i.map(|boot| boot.elapsed().as_secs() as u32))
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();

    // Bind the ESP-IDF logger to the `log` facade
    esp_idf_svc::log::EspLogger::initialize_default();

    if let Ok(mut boot) = BOOT_INSTANT.lock() {
        *boot = Some(Instant::now());
    }

    let config = BridgeConfig::new();

    log::info!("HandSwitch v{} starting (std)", VERSION);
    log::info!(
        "Gesture table loaded: {} rules, primary hand {}",
        defaults::GESTURE_RULES.len(),
        config.frame.primary_hand,
    );

    // ── Peripherals ──────────────────────────────────────────────────

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let _wifi = connect_wifi(peripherals.modem, sys_loop, nvs)?;

    // ── MQTT ─────────────────────────────────────────────────────────

    let (sink, connection) = MqttSink::connect(&config)?;
    let client = sink.shared_client();
    let topic = config.topic;
    thread::Builder::new()
        .name("mqtt".into())
        .stack_size(6144)
        .spawn(move || {
            mqtt::connection_thread(connection, client, topic);
        })?;

    // ── Pipeline thread ──────────────────────────────────────────────

    let (frame_tx, frame_rx) = mpsc::sync_channel::<TimedFrame>(4);
    thread::Builder::new()
        .name("pipeline".into())
        .stack_size(8192)
        .spawn(move || {
            pipeline_thread(frame_rx, sink);
        })?;
    log::info!("Pipeline thread spawned");

    // ── Serial frame reader ──────────────────────────────────────────

    let serial_frame_tx = frame_tx.clone();
    let frame_config = config.frame;
    thread::Builder::new()
        .name("serial".into())
        .stack_size(12288)
        .spawn(move || {
            serial_thread(serial_frame_tx, frame_config);
        })?;
    log::info!("Serial reader spawned at {} baud", comm::SERIAL_BAUD);

    // ── BLE frame input ──────────────────────────────────────────────

    start_ble(frame_tx, config.frame)?;

    // ── Status loop ──────────────────────────────────────────────────

    loop {
        thread::sleep(STATUS_INTERVAL);
        emit(&DeviceMessage::Status {
            frames: FRAMES.load(Ordering::Relaxed),
            hands: HANDS.load(Ordering::Relaxed),
            sent: SENT.load(Ordering::Relaxed),
            mqtt: MQTT_CONNECTED.load(Ordering::Relaxed),
            uptime: uptime_secs(),
            version: VERSION,
        });
        let dropped = DROPPED.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            log::warn!("{} frames dropped in the last {:?}", dropped, STATUS_INTERVAL);
        }
        let failed = PUBLISH_FAILED.load(Ordering::Relaxed);
        if failed > 0 {
            log::warn!("{} publishes failed since boot", failed);
        }
    }
}

// ── WiFi station ─────────────────────────────────────────────────────

fn connect_wifi(
    modem: Modem,
    sys_loop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?, sys_loop)?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: WIFI_SSID
            .try_into()
            .map_err(|_| anyhow::anyhow!("WiFi SSID too long"))?,
        password: WIFI_PASS
            .try_into()
            .map_err(|_| anyhow::anyhow!("WiFi password too long"))?,
        auth_method: if WIFI_PASS.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    }))?;

    wifi.start()?;
    log::info!("WiFi started, connecting to '{}'", WIFI_SSID);
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    log::info!("WiFi connected, IP {}", ip_info.ip);

    Ok(wifi)
}

// ── Pipeline thread ──────────────────────────────────────────────────

fn pipeline_thread(frame_rx: mpsc::Receiver<TimedFrame>, sink: MqttSink) {
    log::info!("Pipeline thread started");

    let mut engine = GestureEngine::new(sink);

    while let Ok(TimedFrame { ts, frame }) = frame_rx.recv() {
        if let Some(code) = engine.process(&frame).and_then(|cmd| cmd.code()) {
            emit(&DeviceMessage::Command { code, ts });
        }

        let stats = engine.stats();
        FRAMES.store(stats.frames, Ordering::Relaxed);
        HANDS.store(stats.hands, Ordering::Relaxed);
        SENT.store(stats.published, Ordering::Relaxed);
        PUBLISH_FAILED.store(engine.sink().failed(), Ordering::Relaxed);
    }

    log::warn!("Frame channel closed, pipeline stopped");
}

/// Write a console message as one NDJSON log line.
fn emit(msg: &DeviceMessage) {
    let mut buf = [0u8; MAX_MSG_LEN];
    if let Some(len) = comm::serialize_message(msg, &mut buf) {
        if let Ok(s) = std::str::from_utf8(&buf[..len]) {
            log::info!("{}", s.trim_end());
        }
    }
}

// ── Frame input ──────────────────────────────────────────────────────

fn queue_frame(line: &[u8], config: &FrameConfig, frame_tx: &SyncSender<TimedFrame>) {
    match comm::parse_frame(line, config) {
        Ok(frame) => {
            if frame_tx.try_send(frame).is_err() {
                DROPPED.fetch_add(1, Ordering::Relaxed);
            }
        }
        Err(e) => log::warn!("Ignoring frame: {}", e),
    }
}

fn serial_thread(frame_tx: SyncSender<TimedFrame>, config: FrameConfig) {
    log::info!("Serial reader started");

    // Line buffer is sized for two full hands; keep it off the stack
    let mut reader = Box::new(LineReader::new());
    let mut chunk = [0u8; 64];
    let mut stdin = std::io::stdin().lock();

    loop {
        match stdin.read(&mut chunk) {
            Ok(0) => thread::sleep(Duration::from_millis(10)),
            Ok(n) => {
                for &byte in &chunk[..n] {
                    if let Some(line) = reader.feed(byte) {
                        queue_frame(line, &config, &frame_tx);
                    }
                }
            }
            Err(_) => thread::sleep(Duration::from_millis(10)),
        }
    }
}

fn start_ble(frame_tx: SyncSender<TimedFrame>, config: FrameConfig) -> anyhow::Result<()> {
    let ble_device = BLEDevice::take();
    let server = ble_device.get_server();

    server.on_connect(|_server, desc| {
        log::info!("BLE client connected: {}", desc.address());
    });
    server.on_disconnect(|desc, _reason| {
        log::info!("BLE client disconnected: {}", desc.address());
    });

    let service_uuid = BleUuid::from_uuid128_string(comm::ble_uuids::SERVICE)
        .map_err(|_| anyhow::anyhow!("invalid service UUID"))?;
    let frame_uuid = BleUuid::from_uuid128_string(comm::ble_uuids::FRAME_CHAR)
        .map_err(|_| anyhow::anyhow!("invalid frame UUID"))?;

    let service = server.create_service(service_uuid);
    let frame_char = service.lock().create_characteristic(
        frame_uuid,
        NimbleProperties::WRITE | NimbleProperties::WRITE_NO_RSP,
    );

    // Writes arrive in MTU-sized chunks; reassemble NDJSON lines. The reader
    // lives on the heap, not on the NimBLE host task's stack.
    let mut reader = Box::new(LineReader::new());
    frame_char.lock().on_write(move |args| {
        for &byte in args.recv_data() {
            if let Some(line) = reader.feed(byte) {
                queue_frame(line, &config, &frame_tx);
            }
        }
    });

    let mut adv_data = BLEAdvertisementData::new();
    adv_data.name(comm::BLE_ADV_NAME).add_service_uuid(service_uuid);
    ble_device
        .get_advertising()
        .lock()
        .set_data(&mut adv_data)
        .map_err(|e| anyhow::anyhow!("BLE advertising data failed: {:?}", e))?;
    ble_device
        .get_advertising()
        .lock()
        .start()
        .map_err(|e| anyhow::anyhow!("BLE advertising start failed: {:?}", e))?;
    log::info!("BLE advertising as '{}'", comm::BLE_ADV_NAME);

    Ok(())
}
