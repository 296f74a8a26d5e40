pub mod controller;
pub mod effect;
pub mod event;
pub mod media;
pub mod phase;
pub mod reactor;
pub mod segment;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod timecode;
