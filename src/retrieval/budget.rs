//! Shared file-read budget
//!
//! One budget is shared by every loop of a query (days, encodings, listing
//! pages). A slot is reserved before an object is fetched and released again
//! if the object turns out to be undecodable, so only successful reads count.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct ReadBudget {
    limit: usize,
    used: AtomicUsize,
}

impl ReadBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Reserve one read slot. Returns `false` once the limit is reached; never
    /// overshoots even when called concurrently.
    pub fn try_reserve(&self) -> bool {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.limit).then_some(used + 1)
            })
            .is_ok()
    }

    /// Give back a slot reserved for a read that did not succeed
    pub fn release(&self) {
        let _ = self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| used.checked_sub(1));
    }

    pub fn is_exhausted(&self) -> bool {
        self.used.load(Ordering::Acquire) >= self.limit
    }

    /// Successful reads so far
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reserve_until_exhausted() {
        let budget = ReadBudget::new(2);
        assert!(budget.try_reserve());
        assert!(!budget.is_exhausted());
        assert!(budget.try_reserve());
        assert!(budget.is_exhausted());
        assert!(!budget.try_reserve());
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn test_release_frees_slot() {
        let budget = ReadBudget::new(1);
        assert!(budget.try_reserve());
        budget.release();
        assert_eq!(budget.used(), 0);
        assert!(budget.try_reserve());

        // Releasing an empty budget is a no-op
        let empty = ReadBudget::new(3);
        empty.release();
        assert_eq!(empty.used(), 0);
    }

    #[test]
    fn test_concurrent_reserve_never_overshoots() {
        let budget = Arc::new(ReadBudget::new(10));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let budget = Arc::clone(&budget);
                std::thread::spawn(move || (0..100).filter(|_| budget.try_reserve()).count())
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 10);
        assert_eq!(budget.used(), 10);
    }
}
