#![cfg_attr(not(test), no_std)]

//! PPM differential-drive controller
//!
//! Decodes two pulse-width radio-control channels, mixes them into left and
//! right motor commands and drives two H-bridges with sign-magnitude PWM,
//! stopping both motors when the radio link is lost.
//!
//! # Layout
//! - [`rc`]: edge hand-off, per-channel decoder state machine and normalizer
//! - [`drive`]: mixer, duty conversion and the two PWM output backends
//! - [`system`]: collaborator interfaces, link indicator and the control loop
//!
//! Everything here is `no_std` and hardware-agnostic. The RP2350 firmware
//! binary (`rp2350` feature) binds it to real pins.

pub mod logging;

pub mod config;
pub mod drive;
pub mod error;
pub mod rc;
pub mod system;

pub use error::Error;
