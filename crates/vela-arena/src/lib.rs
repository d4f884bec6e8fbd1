use bumpalo::Bump;

/// Bump allocator owning every node of one compilation.
///
/// References handed out by [`alloc`](Arena::alloc) live as long as the
/// arena itself, which the caller keeps alive for the whole compilation.
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Bytes currently allocated, for capacity diagnostics.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
