//! Hardware-independent UI core for the deskdial smart-home controller.
//!
//! deskdial is a small battery-powered desk device: a monochrome
//! memory-in-pixel display, a rotary crank, three push buttons, and an MQTT
//! connection used to drive smart-home devices. This crate contains
//! everything that does not touch hardware: the windowed compositor, the
//! list/selection screens, the MQTT dispatch and subscriber binding, and the
//! packed framebuffer the screens draw into.
//!
//! The panel driver, network transport, and interrupt wiring live outside
//! this crate. Their whole contract with the core is to feed the input and
//! inbound MQTT queues and to drain the outbound queue; they never call into
//! rendering directly.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod app;
pub mod config;
pub mod framebuffer;
pub mod input;
pub mod mqtt;
pub mod screens;
pub mod ui;
