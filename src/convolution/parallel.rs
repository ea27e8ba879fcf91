//! Parallel convolution support.

use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::convolution::{Convolution, Stripe};
use crate::error::Result;
use crate::grid::Grid;

/// Parallel convolution options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConvolveOptions {
    /// Number of worker threads. `0` or `1` runs on the calling thread.
    pub num_threads: usize,
}

impl Default for ConvolveOptions {
    fn default() -> Self {
        Self {
            num_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl ConvolveOptions {
    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

impl Convolution<'_> {
    /// Convolve with rows split into contiguous stripes, one per thread.
    ///
    /// Stripes cover disjoint row ranges of the output buffer, so workers
    /// never share a cell. If any stripe fails, the remaining stripes stop
    /// at their next row and the failure of the lowest failing stripe is
    /// returned. No partial grid is ever returned.
    pub fn apply_parallel(&self, source: &Grid, options: ConvolveOptions) -> Result<Grid> {
        let (width, height) = source.dimensions();
        let num_threads = options.num_threads.min(height);
        if num_threads <= 1 {
            return self.apply(source);
        }
        debug!(
            "Convolving {}x{} {} grid with {}x{} kernel across {} threads",
            width,
            height,
            source.kind(),
            self.kernel().width(),
            self.kernel().height(),
            num_threads
        );

        let mut cells = vec![Self::output_kind(source.kind()).zero(); width * height];

        // Partitioning
        let rows_per_thread = height / num_threads;
        let remainder = height % num_threads;

        let mut chunks = Vec::with_capacity(num_threads);
        let mut remaining = cells.as_mut_slice();
        let mut start_row = 0;

        for i in 0..num_threads {
            let extra = if i < remainder { 1 } else { 0 };
            let end_row = start_row + rows_per_thread + extra;

            let (chunk, rest) = remaining.split_at_mut((end_row - start_row) * width);
            chunks.push((chunk, Stripe { start_row, end_row }));
            remaining = rest;
            start_row = end_row;
        }

        let abort = AtomicBool::new(false);
        let results: Vec<Result<()>> = std::thread::scope(|s| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|(chunk, stripe)| {
                    let abort = &abort;
                    s.spawn(move || {
                        trace!("Stripe rows {}..{} started", stripe.start_row, stripe.end_row);
                        let result = self.execute_stripe(source, chunk, stripe, abort);
                        if result.is_err() {
                            abort.store(true, Ordering::Relaxed);
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        for result in results {
            result?;
        }
        debug!("Parallel convolution of {}x{} grid finished", width, height);
        Grid::from_elements(width, height, cells)
    }
}
