pub mod outbound;
pub mod view_ports;
