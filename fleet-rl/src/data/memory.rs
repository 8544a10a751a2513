use rand::{seq::IteratorRandom, Rng};
use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Experience replay storage.
pub trait Memory {
    type T;

    fn push(&mut self, value: Self::T);

    fn append(&mut self, values: Vec<Self::T>) {
        for value in values {
            self.push(value);
        }
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `n` distinct stored values, chosen uniformly.
    fn sample_random_batch(&mut self, n: usize) -> Vec<Self::T>;
}

/// Keeps the most recent `capacity` values, evicting the oldest first.
pub struct RingbufferMemory<T: Clone, R: Rng> {
    rng: R,
    buffer: AllocRingBuffer<T>,
}

impl<T: Clone, R: Rng> RingbufferMemory<T, R> {
    pub fn new(capacity: usize, rng: R) -> RingbufferMemory<T, R> {
        RingbufferMemory {
            rng,
            buffer: AllocRingBuffer::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl<T: Clone, R: Rng> Memory for RingbufferMemory<T, R> {
    type T = T;

    fn push(&mut self, value: T) {
        self.buffer.push(value);
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn sample_random_batch(&mut self, n: usize) -> Vec<T> {
        self.buffer
            .iter()
            .choose_multiple(&mut self.rng, n)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{Memory, RingbufferMemory};

    #[test]
    fn test_ringbuffer_memory_evicts_oldest() {
        let rng = StdRng::seed_from_u64(1234);
        let mut memory = RingbufferMemory::new(10, rng);
        assert!(memory.is_empty());
        memory.append((0..10).collect());
        assert_eq!(memory.len(), 10);

        let mut sample = memory.sample_random_batch(5);
        sample.sort();
        sample.dedup();
        assert_eq!(sample.len(), 5);
        assert!(sample.iter().all(|x| *x < 10));

        memory.append((10..15).collect());
        assert_eq!(memory.len(), memory.capacity());
        let sample = memory.sample_random_batch(10);
        assert_eq!(sample.len(), 10);
        assert!(sample.iter().all(|x| (5..15).contains(x)));
    }

    #[test]
    fn test_sample_larger_than_memory() {
        let mut memory = RingbufferMemory::new(8, StdRng::seed_from_u64(0));
        memory.push(1);
        memory.push(2);
        let mut sample = memory.sample_random_batch(32);
        sample.sort();
        assert_eq!(sample, vec![1, 2]);
    }
}
