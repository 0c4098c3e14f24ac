//! Hardware Resource Management
//!
//! Allocates pins and peripherals to the firmware tasks. Every group is owned
//! by exactly one task, so nothing here is shared.
//!
//! # Resource Groups
//! - Throttle / Steering input: receiver pulse lines (pulled down)
//! - Motor outputs: the four H-bridge inputs, one PWM slice per motor
//! - Status LED: common-cathode RGB LED
//! - Supervisor: hardware watchdog

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// Forward/back receiver channel
    throttle_input: ThrottleInputResources {
        pin: PIN_16,
    },
    /// Left/right receiver channel
    steering_input: SteeringInputResources {
        pin: PIN_17,
    },
    /// H-bridge inputs. Each motor's pins are the A/B outputs of one slice.
    motor_outputs: MotorOutputResources {
        left_slice: PWM_SLICE1,
        left_forward_pin: PIN_18,
        left_reverse_pin: PIN_19,
        right_slice: PWM_SLICE2,
        right_forward_pin: PIN_20,
        right_reverse_pin: PIN_21,
    },
    /// RGB status LED
    status_led: StatusLedResources {
        red_pin: PIN_2,
        green_pin: PIN_4,
        blue_pin: PIN_6,
    },
    /// Hardware watchdog
    supervisor: SupervisorResources {
        watchdog: WATCHDOG,
    },
}
