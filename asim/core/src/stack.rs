use crate::{AsimError, Result};

/// Last-in-first-out stack with a hard capacity fixed at construction.
///
/// Capacity is checked on every mutation, so a failed `push`/`pop` leaves the
/// stack exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStack<T> {
    data: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AsimError::InvalidConfiguration {
                field: "stack_size",
                value: capacity,
            });
        }
        Ok(Self {
            data: Vec::new(),
            capacity,
        })
    }

    pub fn push(&mut self, value: T) -> Result<()> {
        if self.data.len() >= self.capacity {
            return Err(AsimError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.data.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        self.data.pop().ok_or(AsimError::StackUnderflow)
    }

    pub fn top(&self) -> Result<&T> {
        self.data.last().ok_or(AsimError::StackUnderflow)
    }

    pub fn top_mut(&mut self) -> Result<&mut T> {
        self.data.last_mut().ok_or(AsimError::StackUnderflow)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}
