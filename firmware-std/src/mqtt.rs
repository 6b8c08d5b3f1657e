//! MQTT command sink backed by the ESP-IDF client.
//!
//! Commands are enqueued with QoS 0 and no retain, the same fire-and-forget
//! delivery the home controller expects. Reconnects are left to the ESP-IDF
//! client; failed enqueues are logged and dropped.
//!
//! The bridge also subscribes to the command topic and logs every decoded
//! payload, so commands from other publishers show up on the console too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use esp_idf_svc::mqtt::client::{
    EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
};
use handswitch::config::BridgeConfig;
use handswitch::{Command, CommandSink};

/// Broker connection state, reported in status messages.
pub(crate) static MQTT_CONNECTED: AtomicBool = AtomicBool::new(false);

pub type SharedClient = Arc<Mutex<EspMqttClient<'static>>>;

pub struct MqttSink {
    client: SharedClient,
    topic: &'static str,
    failed: u32,
}

impl MqttSink {
    /// Create the client. The returned connection must be drained by
    /// [`connection_thread`] for the client to make progress.
    pub fn connect(config: &BridgeConfig) -> anyhow::Result<(Self, EspMqttConnection)> {
        let url = config
            .broker_url()
            .ok_or_else(|| anyhow::anyhow!("broker URL too long: {}", config.broker))?;

        let (client, connection) = EspMqttClient::new(
            url.as_str(),
            &MqttClientConfiguration {
                client_id: Some(config.client_id),
                keep_alive_interval: Some(Duration::from_secs(config.keep_alive_secs as u64)),
                ..Default::default()
            },
        )?;
        log::info!("MQTT client created for {} (topic '{}')", url, config.topic);

        Ok((
            Self {
                client: Arc::new(Mutex::new(client)),
                topic: config.topic,
                failed: 0,
            },
            connection,
        ))
    }

    /// Handle for the event thread, which subscribes once connected.
    pub fn shared_client(&self) -> SharedClient {
        self.client.clone()
    }

    /// Enqueues the client rejected since boot.
    pub fn failed(&self) -> u32 {
        self.failed
    }
}

impl CommandSink for MqttSink {
    fn publish(&mut self, command: Command) {
        let Some(code) = command.code() else {
            return;
        };
        let Ok(mut client) = self.client.lock() else {
            self.failed = self.failed.wrapping_add(1);
            log::warn!("MQTT client lock poisoned, dropping {}", code);
            return;
        };
        if let Err(e) = client.enqueue(self.topic, QoS::AtMostOnce, false, code.as_bytes()) {
            self.failed = self.failed.wrapping_add(1);
            log::warn!("MQTT publish of {} failed: {}", code, e);
        }
    }
}

/// Drain client events until the connection is dropped.
///
/// Subscribes to `topic` on every (re)connect and logs received commands.
pub fn connection_thread(
    mut connection: EspMqttConnection,
    client: SharedClient,
    topic: &'static str,
) {
    log::info!("MQTT event thread started");

    while let Ok(event) = connection.next() {
        let connected = match event.payload() {
            EventPayload::Connected(_) => {
                MQTT_CONNECTED.store(true, Ordering::Relaxed);
                log::info!("MQTT connected");
                true
            }
            EventPayload::Disconnected => {
                MQTT_CONNECTED.store(false, Ordering::Relaxed);
                log::warn!("MQTT disconnected");
                false
            }
            EventPayload::Received { data, .. } => {
                log_received(topic, data);
                false
            }
            EventPayload::Error(e) => {
                log::warn!("MQTT error: {:?}", e);
                false
            }
            _ => false,
        };
        // Release the event before calling back into the client
        drop(event);

        if connected {
            subscribe(&client, topic);
        }
    }

    MQTT_CONNECTED.store(false, Ordering::Relaxed);
    log::warn!("MQTT connection closed");
}

fn subscribe(client: &SharedClient, topic: &str) {
    let Ok(mut client) = client.lock() else {
        log::warn!("MQTT client lock poisoned, not subscribing");
        return;
    };
    match client.subscribe(topic, QoS::AtMostOnce) {
        Ok(_) => log::info!("Listening on '{}'", topic),
        Err(e) => log::warn!("MQTT subscribe to '{}' failed: {}", topic, e),
    }
}

fn log_received(topic: &str, data: &[u8]) {
    let decoded = core::str::from_utf8(data)
        .ok()
        .and_then(|payload| payload.parse::<Command>().ok());
    match decoded {
        Some(command) => log::info!("Received {} on '{}'", command, topic),
        None => log::warn!(
            "Ignoring unknown payload on '{}' ({} bytes)",
            topic,
            data.len()
        ),
    }
}
