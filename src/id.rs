use crate::model::FactionId;

/// Monotonic faction ID allocator.
/// Ids are never handed out twice, even after a faction is removed during setup.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> FactionId {
        let id = self.next;
        self.next += 1;
        FactionId::new(id)
    }

    /// Number that the next allocated id will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
