/// Converts decibels to a linear amplitude factor (`10^(dB/20)`).
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}
