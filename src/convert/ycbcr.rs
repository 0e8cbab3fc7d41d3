/// Clamp to 0..=255 and round half to even.
fn to_channel(v: f64) -> u8 {
    if v <= 0.0 {
        return 0;
    }
    if v >= 255.0 {
        return 255;
    }
    let whole = v as u8;
    let frac = v - f64::from(whole);
    if frac > 0.5 || (frac == 0.5 && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}

/// JFIF (full-range BT.601) Y, Cb, Cr bytes to 32-bit pixels, alpha 255.
pub(super) fn jfif_row(src: &[u8], dst: &mut [u8], bgra: bool) {
    for (px, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        let y = f64::from(px[0]);
        let cb = f64::from(px[1]) - 128.0;
        let cr = f64::from(px[2]) - 128.0;

        let r = to_channel(y + 1.402 * cr);
        let g = to_channel(y - 0.34414 * cb - 0.71414 * cr);
        let b = to_channel(y + 1.772 * cb);

        if bgra {
            out.copy_from_slice(&[b, g, r, 255]);
        } else {
            out.copy_from_slice(&[r, g, b, 255]);
        }
    }
}
