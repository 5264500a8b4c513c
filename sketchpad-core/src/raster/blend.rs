//! Compositing of straight-alpha colors onto 8-bit pixels.

/// Porter-Duff "source over": paint `src` (straight alpha, `[0, 1]` channels) on top of `dst`.
#[must_use]
pub fn source_over(dst: [u8; 4], src: [f32; 4]) -> [u8; 4] {
    let src_a = src[3];
    if src_a <= 0.0 {
        return dst;
    }
    let dst = dst.map(|channel| f32::from(channel) / 255.0);
    let dst_a = dst[3] * (1.0 - src_a);
    let out_a = src_a + dst_a;
    let mix = |s: f32, d: f32| (s * src_a + d * dst_a) / out_a;
    [
        quantize(mix(src[0], dst[0])),
        quantize(mix(src[1], dst[1])),
        quantize(mix(src[2], dst[2])),
        quantize(out_a),
    ]
}

fn quantize(channel: f32) -> u8 {
    // Clamped, so the cast never saturates.
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
