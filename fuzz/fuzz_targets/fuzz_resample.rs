#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::{SourcePlane, resample_nearest, resample_weighted};

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let (header, samples) = data.split_at(6);
    let dim = |b: u8| usize::from(b % 48);

    let plane = SourcePlane::new(dim(header[0]), dim(header[1]))
        .with_padding(dim(header[0]) + dim(header[4]) % 4, dim(header[1]));
    let (tw, th) = (dim(header[2]), dim(header[3]));

    // Degenerate sizes and short buffers must come back as errors
    let _ = resample_nearest(samples, plane, tw, th, enough::Unstoppable);
    let _ = resample_weighted(samples, plane, tw, th, enough::Unstoppable);

    let floats: Vec<f32> = samples.iter().map(|&b| f32::from(b) / 7.0).collect();
    if header[5] & 1 == 1 {
        let _ = resample_weighted(&floats, plane, tw, th, enough::Unstoppable);
    }
});
