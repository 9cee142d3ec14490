//! Sample hand-off between cpal callbacks and the frame loop.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mono sample queue shared with an audio callback
///
/// The callback pushes, the frame loop drains once per frame. When nobody
/// drains (window minimised, analysis paused) the oldest samples are
/// dropped so the queue never grows beyond `capacity`.
#[derive(Debug, Clone)]
pub struct SampleTap {
    queue: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Push interleaved frames, averaging channels down to mono
    pub fn push_interleaved<I>(&self, samples: I, channels: usize)
    where
        I: IntoIterator<Item = f32>,
    {
        let channels = channels.max(1);
        let mut queue = self.lock();
        let mut acc = 0.0;
        let mut count = 0;

        for sample in samples {
            acc += sample;
            count += 1;
            if count == channels {
                queue.push_back(acc / channels as f32);
                acc = 0.0;
                count = 0;
            }
        }

        let excess = queue.len().saturating_sub(self.capacity);
        queue.drain(..excess);
    }

    /// Take everything pushed since the last drain
    pub fn drain(&self) -> Vec<f32> {
        self.lock().drain(..).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panicking audio callback must not take the frame loop down with it
    fn lock(&self) -> MutexGuard<'_, VecDeque<f32>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_downmix() {
        let tap = SampleTap::new(16);
        tap.push_interleaved([1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);

        assert_eq!(tap.drain(), vec![0.5, 0.5, 0.0]);
        assert!(tap.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let tap = SampleTap::new(3);
        tap.push_interleaved([1.0, 2.0, 3.0, 4.0, 5.0], 1);

        assert_eq!(tap.drain(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_clones_share_queue() {
        let tap = SampleTap::new(8);
        let callback_side = tap.clone();
        callback_side.push_interleaved([0.25], 1);

        assert_eq!(tap.len(), 1);
        tap.clear();
        assert!(callback_side.is_empty());
    }
}
