/// Byte-stream framing for landmark input and console output.
///
/// Detector frames arrive as newline-delimited JSON over serial or BLE
/// writes. Transport code feeds raw bytes into a [`LineReader`] and hands
/// each complete line to [`parse_frame`].

use crate::config::FrameConfig;
use crate::landmark::FrameError;
use crate::protocol::{DeviceMessage, FrameMessage, TimedFrame, MAX_FRAME_LEN};

/// BLE GATT UUIDs for the frame input service.
pub mod ble_uuids {
    /// HandSwitch primary service UUID
    pub const SERVICE: &str = "6b1e0001-8d3f-4c0b-9a57-2f4e51c8d0a3";
    /// RX characteristic: landmark frames, write
    pub const FRAME_CHAR: &str = "6b1e0002-8d3f-4c0b-9a57-2f4e51c8d0a3";
}

/// BLE advertising name
pub const BLE_ADV_NAME: &str = "HandSwitch";

/// Serial baud rate
pub const SERIAL_BAUD: u32 = 115200;

/// Serialize a DeviceMessage to JSON bytes and write to the output buffer.
/// Returns the number of bytes written, or None if serialization failed.
pub fn serialize_message(msg: &DeviceMessage, buf: &mut [u8]) -> Option<usize> {
    match serde_json_core::to_slice(msg, buf) {
        Ok(len) => {
            // Append newline for NDJSON
            if len < buf.len() {
                buf[len] = b'\n';
                Some(len + 1)
            } else {
                Some(len)
            }
        }
        Err(_) => None,
    }
}

/// Decode one line of detector output into a frame for the engine.
pub fn parse_frame(data: &[u8], config: &FrameConfig) -> Result<TimedFrame, FrameError> {
    let trimmed = trim_trailing_whitespace(data);
    if trimmed.is_empty() {
        return Err(FrameError::Json);
    }
    let (msg, _) =
        serde_json_core::from_slice::<FrameMessage>(trimmed).map_err(|_| FrameError::Json)?;
    Ok(TimedFrame {
        ts: msg.ts,
        frame: msg.to_frame(config)?,
    })
}

/// Line accumulator for NDJSON byte streams.
/// Accumulates bytes until a newline is found, then yields the line.
pub struct LineReader {
    buf: [u8; MAX_FRAME_LEN],
    pos: usize,
    overflowed: bool,
}

impl LineReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_FRAME_LEN],
            pos: 0,
            overflowed: false,
        }
    }

    /// Feed a byte into the reader. Returns a complete line (without newline)
    /// when one is detected. Lines longer than the buffer are dropped whole.
    pub fn feed(&mut self, byte: u8) -> Option<&[u8]> {
        if byte == b'\n' || byte == b'\r' {
            let len = self.pos;
            let overflowed = self.overflowed;
            self.pos = 0;
            self.overflowed = false;
            if len > 0 && !overflowed {
                Some(&self.buf[..len])
            } else {
                None
            }
        } else if self.overflowed {
            None
        } else if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
            self.pos += 1;
            None
        } else {
            log::warn!("Frame line exceeds {} bytes, dropping", MAX_FRAME_LEN);
            self.overflowed = true;
            None
        }
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_trailing_whitespace(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end > 0 && data[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &data[..end]
}
