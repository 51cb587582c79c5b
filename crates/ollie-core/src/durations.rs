use std::collections::HashMap;

/// Per-trick animation lengths, looked up by catalog index when a trick executes.
pub trait DurationTable {
    fn duration(&self, trick: usize) -> Option<f32>;
}

impl DurationTable for [f32] {
    fn duration(&self, trick: usize) -> Option<f32> {
        self.get(trick).copied()
    }
}

impl DurationTable for Vec<f32> {
    fn duration(&self, trick: usize) -> Option<f32> {
        self.as_slice().duration(trick)
    }
}

impl DurationTable for HashMap<usize, f32> {
    fn duration(&self, trick: usize) -> Option<f32> {
        self.get(&trick).copied()
    }
}

impl<T: DurationTable + ?Sized> DurationTable for &T {
    fn duration(&self, trick: usize) -> Option<f32> {
        (**self).duration(trick)
    }
}

/// Sparse table indexed by trick ordinal; built from a session file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Durations {
    seconds: Vec<Option<f32>>,
}

impl Durations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, trick: usize, seconds: f32) {
        if self.seconds.len() <= trick {
            self.seconds.resize(trick + 1, None);
        }
        self.seconds[trick] = Some(seconds);
    }
}

impl FromIterator<Option<f32>> for Durations {
    fn from_iter<I: IntoIterator<Item = Option<f32>>>(iter: I) -> Self {
        Self {
            seconds: iter.into_iter().collect(),
        }
    }
}

impl DurationTable for Durations {
    fn duration(&self, trick: usize) -> Option<f32> {
        self.seconds.get(trick).copied().flatten()
    }
}
