// Drive module for the two-wheel remote base
//
// Provides:
// - Control law (tilt sample -> left/right motor speeds)
// - 5-byte wire frame encoder
// - Run/stop controller owning the shared command and the UDP link

mod controller;
pub mod frame;
pub mod mixer;

pub use controller::DriveController;
