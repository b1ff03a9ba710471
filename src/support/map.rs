/// Maps `v` from `[in_min, in_max]` onto `[out_min, out_max]`
/// *-------х-------*
/// ^in_min ^v      ^in_max
///
/// *-------x-------*
/// ^out_min ^res   ^out_max
/// res = (v - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
///
/// Integer arithmetic, division truncates toward zero. The result is not
/// limited to the output range.
pub fn map(v: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i64 {
    let span = i64::from(in_max) - i64::from(in_min);
    if span == 0 {
        return i64::from(out_min);
    }

    (i64::from(v) - i64::from(in_min)) * (i64::from(out_max) - i64::from(out_min)) / span
        + i64::from(out_min)
}

/// Saturates into the 8-bit output range.
pub fn to_u8(v: i64) -> u8 {
    num::clamp(v, 0, i64::from(u8::MAX)) as u8
}
