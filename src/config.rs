/// Compile-time defaults for frame ingest and the command transport.
use core::fmt::Write;

/// Default topic every command is published to.
pub const DEFAULT_TOPIC: &str = "home/central";

/// Default public broker.
pub const DEFAULT_BROKER: &str = "broker.hivemq.com";

pub const DEFAULT_PORT: u16 = 1883;

pub const DEFAULT_KEEP_ALIVE_SECS: u16 = 60;

/// How detector output is mapped onto pixel landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Image width used to scale normalized x when a frame carries none.
    pub width: u16,
    /// Image height used to scale normalized y when a frame carries none.
    pub height: u16,
    /// Which detected hand drives the engine.
    pub primary_hand: u8,
}

impl FrameConfig {
    pub const fn new() -> Self {
        Self {
            width: 640,
            height: 480,
            primary_hand: 0,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Broker URL buffer ("mqtt://host:port").
pub type BrokerUrl = heapless::String<96>;

/// Bridge settings: where commands go and how frames are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    pub topic: &'static str,
    pub broker: &'static str,
    pub port: u16,
    pub keep_alive_secs: u16,
    pub client_id: &'static str,
    pub frame: FrameConfig,
}

impl BridgeConfig {
    pub const fn new() -> Self {
        Self {
            topic: DEFAULT_TOPIC,
            broker: DEFAULT_BROKER,
            port: DEFAULT_PORT,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            client_id: "handswitch",
            frame: FrameConfig::new(),
        }
    }

    /// Broker URL for the MQTT client. `None` if the host name is too long.
    pub fn broker_url(&self) -> Option<BrokerUrl> {
        let mut url = BrokerUrl::new();
        write!(url, "mqtt://{}:{}", self.broker, self.port).ok()?;
        Some(url)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_home_broker() {
        let config = BridgeConfig::default();
        assert_eq!(config.topic, "home/central");
        assert_eq!(config.broker, "broker.hivemq.com");
        assert_eq!(config.port, 1883);
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.frame.primary_hand, 0);
    }

    #[test]
    fn broker_url_includes_port() {
        let url = BridgeConfig::new().broker_url().unwrap();
        assert_eq!(url.as_str(), "mqtt://broker.hivemq.com:1883");
    }

    #[test]
    fn broker_url_too_long_is_none() {
        let config = BridgeConfig {
            broker: "a-very-long-host-name-that-does-not-fit-in-the-fixed-url-buffer.for-the-mqtt-client.example.internal.net",
            ..BridgeConfig::new()
        };
        assert!(config.broker_url().is_none());
    }
}
