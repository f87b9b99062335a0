//! Buffered directional intents.

use std::collections::VecDeque;

use snake_survival_core::Direction;

/// Bounded queue of headings consumed one per movement tick, oldest first.
///
/// Queuing validates against the most recently queued heading rather than the
/// applied one so that quick "staircase" inputs survive until their tick. A
/// full buffer overwrites its newest entry instead of growing or dropping the
/// oldest intent.
#[derive(Clone, Debug)]
pub struct InputBuffer {
    queue: VecDeque<Direction>,
    capacity: usize,
    preview: Direction,
}

impl InputBuffer {
    /// Creates an empty buffer whose preview faces `facing`.
    #[must_use]
    pub(crate) fn new(capacity: usize, facing: Direction) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            preview: facing,
        }
    }

    /// Heading the head should be drawn facing.
    #[must_use]
    pub fn preview(&self) -> Direction {
        self.preview
    }

    /// Maximum number of buffered intents.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether no intent is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Buffered intents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.queue.iter().copied()
    }

    /// Buffers `direction`, returning whether the buffer accepted it.
    ///
    /// Reversals of the newest buffered heading (or of `current` when nothing
    /// is buffered) and repeats of the newest heading are ignored.
    pub(crate) fn queue(&mut self, direction: Direction, current: Direction) -> bool {
        let newest = self.queue.back().copied();
        let baseline = newest.unwrap_or(current);
        if baseline.is_opposite(direction) || newest == Some(direction) {
            return false;
        }

        if self.queue.len() >= self.capacity {
            if let Some(slot) = self.queue.back_mut() {
                *slot = direction;
            }
        } else {
            self.queue.push_back(direction);
        }

        self.preview = direction;
        true
    }

    /// Pops the oldest intent for a movement tick.
    ///
    /// An intent that would reverse `current` is discarded and `None` is
    /// returned, leaving the snake on its current heading.
    pub(crate) fn dequeue_for_tick(&mut self, current: Direction) -> Option<Direction> {
        let next = self.queue.pop_front()?;
        let applied = if current.is_opposite(next) {
            None
        } else {
            Some(next)
        };
        self.preview = self
            .queue
            .back()
            .copied()
            .unwrap_or_else(|| applied.unwrap_or(current));
        applied
    }

    /// Drops every buffered intent.
    pub(crate) fn clear(&mut self, facing: Direction) {
        self.queue.clear();
        self.preview = facing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(buffer: &InputBuffer) -> Vec<Direction> {
        buffer.iter().collect()
    }

    #[test]
    fn ignores_reversal_of_current_heading() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        for current in Direction::ALL {
            assert!(!buffer.queue(current.opposite(), current));
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn validates_against_newest_buffered_heading() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        assert!(buffer.queue(Direction::Up, Direction::Right));
        assert!(!buffer.queue(Direction::Down, Direction::Right));
        assert!(buffer.queue(Direction::Left, Direction::Right));
        assert_eq!(contents(&buffer), vec![Direction::Up, Direction::Left]);
        assert_eq!(buffer.preview(), Direction::Left);
    }

    #[test]
    fn ignores_repeat_of_newest_heading() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        assert!(buffer.queue(Direction::Up, Direction::Right));
        assert!(!buffer.queue(Direction::Up, Direction::Right));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn full_buffer_overwrites_newest_entry() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        for direction in [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Right,
        ] {
            assert!(buffer.queue(direction, Direction::Right));
        }
        assert_eq!(buffer.len(), buffer.capacity());

        assert!(buffer.queue(Direction::Up, Direction::Right));
        assert_eq!(
            contents(&buffer),
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Up
            ]
        );
    }

    #[test]
    fn dequeues_oldest_first() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        assert!(buffer.queue(Direction::Up, Direction::Right));
        assert!(buffer.queue(Direction::Left, Direction::Right));

        assert_eq!(buffer.dequeue_for_tick(Direction::Right), Some(Direction::Up));
        assert_eq!(buffer.dequeue_for_tick(Direction::Up), Some(Direction::Left));
        assert_eq!(buffer.dequeue_for_tick(Direction::Left), None);
        assert_eq!(buffer.preview(), Direction::Left);
    }

    #[test]
    fn dequeue_discards_stale_reversal() {
        let mut buffer = InputBuffer::new(4, Direction::Right);
        assert!(buffer.queue(Direction::Left, Direction::Up));

        assert_eq!(buffer.dequeue_for_tick(Direction::Right), None);
        assert!(buffer.is_empty());
        assert_eq!(buffer.preview(), Direction::Right);
    }
}
