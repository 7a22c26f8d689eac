use serde::de::DeserializeOwned;
use serde::Serialize;

/// Text encoding used between a typed value and durable storage.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, String>;
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, String>;
}

/// Compact JSON, the encoding local storage has always held.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, String> {
        serde_json::to_string(value).map_err(|e| e.to_string())
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}
