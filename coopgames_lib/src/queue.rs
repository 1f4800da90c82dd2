//! Shared queue of pending work.

use std::collections::VecDeque;
use std::sync::Mutex;

/// A FIFO queue drained concurrently by several workers.
///
/// [`pop`](Self::pop) removes and returns the head under one lock, so an item
/// is handed to exactly one caller and is never visible in the queue once it
/// has been handed out.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> WorkQueue<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
        }
    }

    /// Takes the next item, or `None` once the queue is empty.
    pub fn pop(&self) -> Option<T> {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
