//! The binary contract of the statement parsing engine.
//!
//! The engine is an opaque module exposing a linear memory, a scratch stack
//! (`stackSave` / `stackAlloc` / `stackRestore`) and a single entry point that
//! parses one statement. [`ScratchScope`] ties a stack checkpoint to a Rust
//! scope so the stack is restored on every exit path.

use std::ops::{Deref, DerefMut};

use super::EngineError;

/// A loaded statement parsing engine.
pub trait StatementEngine: Send {
    /// The engine's linear memory.
    fn memory(&self) -> &[u8];

    fn memory_mut(&mut self) -> &mut [u8];

    /// Current scratch stack position.
    fn stack_save(&mut self) -> u32;

    /// Reserve `size` bytes of scratch and return their address.
    fn stack_alloc(&mut self, size: u32) -> Result<u32, EngineError>;

    /// Reset the scratch stack to a position returned by [`stack_save`](Self::stack_save).
    fn stack_restore(&mut self, marker: u32);

    /// Parse one statement from `input_len` bytes at `input`, starting at
    /// `start_offset`. Writes the statement and status records to the given
    /// addresses and returns the number of characters consumed.
    fn parse_statement(
        &mut self,
        input: u32,
        input_len: u32,
        start_offset: u32,
        out_statement: u32,
        out_status: u32,
    ) -> Result<i32, EngineError>;
}

/// Scratch stack checkpoint restored when dropped.
pub struct ScratchScope<'a, E: StatementEngine + ?Sized> {
    engine: &'a mut E,
    marker: u32,
}

impl<'a, E: StatementEngine + ?Sized> ScratchScope<'a, E> {
    pub fn enter(engine: &'a mut E) -> Self {
        let marker = engine.stack_save();
        Self { engine, marker }
    }

    /// The stack position that will be restored.
    pub fn marker(&self) -> u32 {
        self.marker
    }
}

impl<E: StatementEngine + ?Sized> Deref for ScratchScope<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.engine
    }
}

impl<E: StatementEngine + ?Sized> DerefMut for ScratchScope<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.engine
    }
}

impl<E: StatementEngine + ?Sized> Drop for ScratchScope<'_, E> {
    fn drop(&mut self) {
        self.engine.stack_restore(self.marker);
    }
}

/// Linear memory with a downward-growing scratch stack.
///
/// The stack occupies the top `stack_size` bytes; allocations are 16-byte
/// aligned. Native engines and test doubles use this to satisfy the scratch
/// half of [`StatementEngine`].
#[derive(Debug, Clone)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    stack_pointer: u32,
    stack_limit: u32,
}

const STACK_ALIGN: u32 = 16;

impl LinearMemory {
    /// Create `size` bytes of zeroed memory whose top `stack_size` bytes are the stack.
    pub fn new(size: u32, stack_size: u32) -> Self {
        let top = size & !(STACK_ALIGN - 1);
        Self {
            bytes: vec![0; size as usize],
            stack_pointer: top,
            stack_limit: top.saturating_sub(stack_size),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn save(&self) -> u32 {
        self.stack_pointer
    }

    pub fn alloc(&mut self, size: u32) -> Result<u32, EngineError> {
        let available = self.stack_pointer - self.stack_limit;
        let next = self
            .stack_pointer
            .checked_sub(size)
            .map(|sp| sp & !(STACK_ALIGN - 1))
            .filter(|sp| *sp >= self.stack_limit)
            .ok_or(EngineError::StackOverflow {
                requested: size,
                available,
            })?;
        self.stack_pointer = next;
        Ok(next)
    }

    pub fn restore(&mut self, marker: u32) {
        self.stack_pointer = marker;
    }
}
