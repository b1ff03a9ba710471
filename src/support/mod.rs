mod map;
pub use map::{map, to_u8};

mod ticks;
pub use ticks::{elapsed, TickRate, Ticks};
