//! Symbol sources
//!
//! The engine never touches a global RNG; it draws from an injected source so
//! runs are reproducible from a seed and tests can script exact sequences.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::symbol::Symbol;

/// Produces the next drum to append to the sequence
pub trait SymbolSource {
    fn next_symbol(&mut self, symbol_count: u8) -> Symbol;
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn next_symbol(&mut self, symbol_count: u8) -> Symbol {
        (**self).next_symbol(symbol_count)
    }
}

/// Uniform, seeded source (independent draws, replacement allowed)
#[derive(Debug, Clone)]
pub struct PcgSymbolSource {
    rng: Pcg32,
}

impl PcgSymbolSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl SymbolSource for PcgSymbolSource {
    fn next_symbol(&mut self, symbol_count: u8) -> Symbol {
        let count = symbol_count.max(1);
        Symbol::wrapping(u32::from(self.rng.random_range(0..count)), count)
    }
}

/// Replays a fixed list of drum indices, cycling when exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedSymbols {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedSymbols {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl SymbolSource for ScriptedSymbols {
    fn next_symbol(&mut self, symbol_count: u8) -> Symbol {
        if self.values.is_empty() {
            return Symbol::wrapping(0, symbol_count);
        }
        let raw = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Symbol::wrapping(raw, symbol_count)
    }
}
