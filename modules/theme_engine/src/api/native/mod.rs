//! Native (in-process) API

mod client;

pub use client::NativeClient;
