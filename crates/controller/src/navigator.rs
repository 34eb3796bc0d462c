/// Current position on the date axis, bounded to `[0, count - 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateNavigator {
    index: usize,
    count: usize,
}

impl DateNavigator {
    /// Starts at index 0. A zero `count` is treated as one date.
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count: count.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn max_index(&self) -> usize {
        self.count - 1
    }

    /// Absolute move (slider). Out-of-range targets clamp silently.
    ///
    /// Returns `true` if the index changed.
    pub fn set_index(&mut self, target: i64) -> bool {
        let clamped = target.clamp(0, self.max_index() as i64) as usize;
        self.move_to(clamped)
    }

    /// Relative move (keyboard). A step that would leave the range is a no-op;
    /// there is no wrap-around.
    ///
    /// Returns `true` if the index changed.
    pub fn step(&mut self, delta: i64) -> bool {
        let target = (self.index as i64).saturating_add(delta);
        if target < 0 || target > self.max_index() as i64 {
            return false;
        }
        self.move_to(target as usize)
    }

    fn move_to(&mut self, index: usize) -> bool {
        if index == self.index {
            return false;
        }
        self.index = index;
        true
    }
}
