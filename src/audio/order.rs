//! Play order: the permutation of store indices that next/prev walk.

use rand::seq::SliceRandom;

/// Build a traversal order over `track_count` tracks.
///
/// With `shuffle` the order is a uniform random permutation, otherwise the
/// identity. With `preserve_current`, a present `current` is rotated to the
/// front so the playing track stays put. Returns the order and the position
/// of `current` in it (0 when absent).
pub fn generate(
    track_count: usize,
    shuffle: bool,
    current: Option<usize>,
    preserve_current: bool,
) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..track_count).collect();
    if shuffle && track_count > 1 {
        order.shuffle(&mut rand::rng());
    }

    let pos = current
        .and_then(|c| order.iter().position(|&i| i == c))
        .unwrap_or(0);

    if preserve_current && pos > 0 {
        order.rotate_left(pos);
        return (order, 0);
    }
    (order, pos)
}

/// A play order plus the cursor into it.
#[derive(Debug, Clone, Default)]
pub struct PlayOrder {
    indices: Vec<usize>,
    position: usize,
}

impl PlayOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regenerate(
        &mut self,
        track_count: usize,
        shuffle: bool,
        current: Option<usize>,
        preserve_current: bool,
    ) {
        let (indices, position) = generate(track_count, shuffle, current, preserve_current);
        self.indices = indices;
        self.position = position;
    }

    /// True when this order is a traversal over exactly `track_count` tracks.
    pub fn covers(&self, track_count: usize) -> bool {
        self.indices.len() == track_count && track_count > 0
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Track index under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.indices.get(self.position).copied()
    }

    /// Move the cursor onto `index`, if present.
    pub fn seek_to(&mut self, index: usize) -> bool {
        match self.indices.iter().position(|&i| i == index) {
            Some(p) => {
                self.position = p;
                true
            }
            None => false,
        }
    }

    /// Step forward with wraparound and return the new track index.
    pub fn advance(&mut self) -> Option<usize> {
        self.step(1)
    }

    /// Step backward with wraparound and return the new track index.
    pub fn retreat(&mut self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<usize> {
        let len = self.indices.len() as isize;
        if len == 0 {
            return None;
        }
        self.position = ((self.position as isize + delta + len) % len) as usize;
        self.current()
    }
}
