//! The dense catalog ID space and ring arithmetic over it.

use serde::{Deserialize, Serialize};

use crate::{RecordId, RosterError, RosterResult};

/// Direction of travel around the ID ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// +1
    Forward,
    /// -1
    Backward,
}

impl Direction {
    pub fn offset(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// The ordered sequence of valid IDs `1..=N`.
///
/// Every ID in range is structurally valid; whether it currently resolves is
/// a question for the source, not for this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogIdSpace {
    size: u32,
}

impl CatalogIdSpace {
    pub fn new(size: u32) -> RosterResult<Self> {
        if size == 0 {
            return Err(RosterError::invalid_argument(
                "catalog_size",
                "catalog must contain at least one id",
            ));
        }
        Ok(Self { size })
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// Always false; an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: RecordId) -> bool {
        id.get() <= self.size
    }

    /// Zero-based position of `id`, or `None` when it is out of range.
    pub fn index_of(&self, id: RecordId) -> Option<usize> {
        self.contains(id).then(|| (id.get() - 1) as usize)
    }

    pub fn id_at(&self, index: usize) -> Option<RecordId> {
        (index < self.len()).then(|| RecordId(index as u32 + 1))
    }

    /// Next index in `direction`, wrapping: `(index + direction + N) % N`.
    pub fn step_index(&self, index: usize, direction: Direction) -> usize {
        let n = self.size as i64;
        ((index as i64 + direction.offset() + n) % n) as usize
    }

    /// Neighbor of `id` in `direction`, or `None` when `id` is out of range.
    pub fn step(&self, id: RecordId, direction: Direction) -> Option<RecordId> {
        let index = self.index_of(id)?;
        self.id_at(self.step_index(index, direction))
    }

    pub fn first(&self) -> RecordId {
        RecordId(1)
    }

    pub fn last(&self) -> RecordId {
        RecordId(self.size)
    }

    /// All IDs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        (1..=self.size).map(RecordId)
    }
}
