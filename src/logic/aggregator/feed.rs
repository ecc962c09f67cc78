//! Feed Window - Last N events, newest first.

use std::collections::VecDeque;

use crate::logic::event::ClassificationEvent;

#[derive(Debug, Clone)]
pub struct FeedWindow {
    items: VecDeque<ClassificationEvent>,
    capacity: usize,
}

impl FeedWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend in arrival order, evicting the oldest beyond capacity
    pub fn push(&mut self, event: ClassificationEvent) {
        self.items.push_front(event);
        self.items.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&ClassificationEvent> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationEvent> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ClassificationEvent> {
        self.items.iter().cloned().collect()
    }
}
