/// Scales an 8-bit level onto a timer channel with `max_duty` resolution.
pub fn scale_duty(level: u8, max_duty: u16) -> u16 {
    (u32::from(level) * u32::from(max_duty) / u32::from(u8::MAX)) as u16
}
