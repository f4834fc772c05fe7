//! Heartbeat JSON body

use serde::Serialize;

use crate::config::SensorConfig;
use crate::error::HttpError;

/// Upper bound of a serialized body.
pub const MAX_BODY_LEN: usize = 384;

/// Body of `POST /api/v1/heartbeat`.
///
/// Optional fields are omitted, not sent as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartbeatPayload<'a> {
    /// Shared secret
    pub api_key: &'a str,
    /// Building id
    pub building_id: u8,
    /// Section id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u16>,
    /// Sensor identifier
    pub sensor_uuid: &'a str,
    /// Free-form note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

impl<'a> HeartbeatPayload<'a> {
    /// Payload for `config`.
    pub const fn from_config(config: &'a SensorConfig) -> Self {
        Self {
            api_key: config.api_key,
            building_id: config.building_id,
            section_id: config.section_id,
            sensor_uuid: config.sensor_uuid,
            comment: config.comment(),
        }
    }

    /// Serialize into `buf`, returning the body length.
    pub fn write_json(&self, buf: &mut [u8]) -> Result<usize, HttpError> {
        serde_json_core::to_slice(self, buf).map_err(|_| HttpError::RequestTooLarge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(payload: &HeartbeatPayload<'_>) -> std::string::String {
        let mut buf = [0u8; MAX_BODY_LEN];
        let len = payload.write_json(&mut buf).unwrap();
        std::string::String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn default_sensor_body() {
        let config = SensorConfig::new().with_api_key("K");
        assert_eq!(
            json(&HeartbeatPayload::from_config(&config)),
            r#"{"api_key":"K","building_id":1,"section_id":2,"sensor_uuid":"esp32-newcastle-002"}"#
        );
    }

    #[test]
    fn optional_fields() {
        let config = SensorConfig::new()
            .with_api_key("K")
            .with_section_id(None)
            .with_comment("kv 12");
        assert_eq!(
            json(&HeartbeatPayload::from_config(&config)),
            r#"{"api_key":"K","building_id":1,"sensor_uuid":"esp32-newcastle-002","comment":"kv 12"}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        let config = SensorConfig::new().with_api_key("K").with_comment("say \"hi\"");
        assert!(json(&HeartbeatPayload::from_config(&config)).ends_with(r#""comment":"say \"hi\""}"#));
    }

    #[test]
    fn small_buffer_is_rejected() {
        let config = SensorConfig::new().with_api_key("K");
        let mut buf = [0u8; 16];
        assert_eq!(
            HeartbeatPayload::from_config(&config).write_json(&mut buf),
            Err(HttpError::RequestTooLarge)
        );
    }
}
