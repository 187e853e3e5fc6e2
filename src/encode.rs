use super::errors::Result;

/// Encodable marks a type with a defined wire representation.
///
/// Implemented by every frame building block: the header, the address
/// record and the message payloads.
pub trait Encodable {
    fn to_bytes(&self) -> Result<Vec<u8>>;
}

/// Decodable rebuilds a wire type from the front of a byte slice.
pub trait Decodable {
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// encode converts a wire type to its byte form
pub fn encode<T: Encodable>(object: &T) -> Result<Vec<u8>> {
    object.to_bytes()
}

/// decode parses a wire type out of `bytes`
pub fn decode<T: Decodable>(bytes: &[u8]) -> Result<T> {
    T::from_bytes(bytes)
}
