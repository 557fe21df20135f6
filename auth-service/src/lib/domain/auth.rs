pub mod lockout;
pub mod ports;
pub mod service;
