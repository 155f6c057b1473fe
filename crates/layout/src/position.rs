//! Break positions.
//!
//! A break position is an opaque, nestable handle: "break occurred at
//! element K of manager M". Each manager that re-issues a child's elements
//! wraps their positions one level deeper, so an outer breaking pass can
//! address break points produced by arbitrarily deep managers without the
//! tree collapsing into one flat sequence. Positions are immutable after
//! creation and only ever read back by the chain of managers that built
//! them.

use galley_types::ManagerId;

#[derive(Debug, Clone, PartialEq)]
pub struct BreakPosition {
    manager: ManagerId,
    index: usize,
    inner: Option<Box<BreakPosition>>,
}

impl BreakPosition {
    /// A position created by the manager that directly owns the content.
    pub fn leaf(manager: ManagerId, index: usize) -> Self {
        Self {
            manager,
            index,
            inner: None,
        }
    }

    /// A position wrapping one produced by a child manager.
    pub fn wrapping(manager: ManagerId, index: usize, inner: BreakPosition) -> Self {
        Self {
            manager,
            index,
            inner: Some(Box::new(inner)),
        }
    }

    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    /// The element index within the owning manager's generated sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inner(&self) -> Option<&BreakPosition> {
        self.inner.as_deref()
    }

    pub fn into_inner(self) -> Option<BreakPosition> {
        self.inner.map(|boxed| *boxed)
    }

    /// Chain length, 1 for a leaf.
    pub fn depth(&self) -> usize {
        1 + self.inner.as_ref().map_or(0, |p| p.depth())
    }
}

/// Iterates a replay span's positions, yielding maximal runs of
/// consecutive positions owned by the same manager. Managers use this to
/// hand each child exactly one contiguous slice of the span.
#[derive(Debug)]
pub struct PositionIter {
    positions: std::vec::IntoIter<BreakPosition>,
    peeked: Option<BreakPosition>,
}

impl PositionIter {
    pub fn new(positions: Vec<BreakPosition>) -> Self {
        Self {
            positions: positions.into_iter(),
            peeked: None,
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }

    fn peek(&mut self) -> Option<&BreakPosition> {
        if self.peeked.is_none() {
            self.peeked = self.positions.next();
        }
        self.peeked.as_ref()
    }

    fn take(&mut self) -> Option<BreakPosition> {
        self.peeked.take().or_else(|| self.positions.next())
    }

    /// The owner of the next pending run, if any positions remain.
    pub fn next_owner(&mut self) -> Option<ManagerId> {
        self.peek().map(|p| p.manager())
    }

    /// Removes and returns the next run of consecutive positions sharing
    /// one owner.
    pub fn next_run(&mut self) -> Option<(ManagerId, Vec<BreakPosition>)> {
        let owner = self.next_owner()?;
        let mut run = Vec::new();
        while self.peek().is_some_and(|p| p.manager() == owner) {
            if let Some(p) = self.take() {
                run.push(p);
            }
        }
        Some((owner, run))
    }
}
