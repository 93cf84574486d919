//! Fixed-capacity stack used for both a task's data stack and its call
//! stack. Capacity is set once at task creation and never grows — the
//! spec is explicit that stack growth is not supported.

pub struct FixedStack<T> {
    buf: Vec<T>,
    capacity: usize,
}

impl<T> FixedStack<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity), capacity }
    }

    /// Pushes `value`, returning it back on failure rather than dropping
    /// it, so a caller that needs to check capacity before committing a
    /// whole range can always recover.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.buf.len() >= self.capacity {
            return Err(value);
        }
        self.buf.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_respects_capacity() {
        let mut s: FixedStack<i32> = FixedStack::with_capacity(2);
        assert!(s.push(1).is_ok());
        assert!(s.push(2).is_ok());
        assert_eq!(s.push(3), Err(3));
    }

    #[test]
    fn pop_is_lifo() {
        let mut s: FixedStack<i32> = FixedStack::with_capacity(4);
        s.push(1).unwrap();
        s.push(2).unwrap();
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), None);
    }
}
