pub mod control_loop;
pub mod edge_capture;
pub mod resources;
pub mod status_led;
