//! Session-facing value objects: availability probing results, session
//! creation parameters, requests, and streaming chunks.

pub mod availability;
pub mod params;
pub mod request;
pub mod stream;
