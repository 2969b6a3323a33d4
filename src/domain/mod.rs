// Domain layer: result rows, event template and ports. No I/O here.

pub mod columns;
pub mod event;
pub mod model;
pub mod ports;
pub mod swim_time;
pub mod template;
