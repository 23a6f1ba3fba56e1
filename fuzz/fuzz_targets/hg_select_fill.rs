#![no_main]

use hg_hist::{BinEdges, Histogram, Selector, resolve};
use libfuzzer_sys::fuzz_target;
use ndarray::{ArrayD, Dimension, IxDyn};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // Small grids keep each run fast.
    let shape = [(data[0] % 5) as usize, (data[1] % 5) as usize];
    let selector: Vec<Selector> = data[2..]
        .chunks(3)
        .take(4)
        .map(|c| match c[0] % 4 {
            0 => Selector::Index(i64::from(c.get(1).copied().unwrap_or(0) as i8)),
            1 => Selector::Range {
                start: i64::from(c.get(1).copied().unwrap_or(0) % 8) - 1,
                stop: i64::from(c.get(2).copied().unwrap_or(0) % 8),
                step: usize::from(c.get(2).copied().unwrap_or(0) % 3),
            },
            2 => Selector::Whole,
            _ => Selector::NewAxis,
        })
        .collect();

    let Ok(resolved) = resolve(&selector, &shape) else {
        return;
    };

    let Ok(edges) = BinEdges::new([0.0, 1.0, 2.0, 4.0]) else {
        return;
    };
    let mut h = Histogram::new(edges, &shape);
    let _ = h.select(&selector);

    let mut batch = resolved.shape().to_vec();
    batch.push(3);
    let samples = ArrayD::from_shape_fn(IxDyn(&batch), |ix| ix.as_array_view().sum() as f32 - 1.0);
    if h.fill_selected(&selector, samples.view()).is_ok() {
        let n: usize = batch.iter().product();
        let flows = u64::from(h.underflow().sum()) + u64::from(h.overflow().sum());
        assert_eq!(h.total() + flows, n as u64);
    }
});
