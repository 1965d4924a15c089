use std::ops::Range;

use itertools::Itertools;

use crate::Show;

/// Symbols are addressed by their position in the [`Alphabet`], which is the column of the
/// transition table that they select.
pub type SymbolIndex = usize;

/// An ordered collection of symbols. The automata in this crate only ever look at the number
/// of symbols, the names are kept around so that results can be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alphabet(Vec<String>);

impl Alphabet {
    /// Creates a new alphabet from the given symbol names, in the given order.
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Creates an alphabet with `size` symbols. The first 26 are named `a` through `z`, any
    /// further symbols are named by their index, e.g. `s26`.
    pub fn of_size(size: usize) -> Self {
        Self(
            (0..size)
                .map(|i| match u8::try_from(i) {
                    Ok(i) if i < 26 => ((b'a' + i) as char).to_string(),
                    _ => format!("s{i}"),
                })
                .collect(),
        )
    }

    /// The number of symbols, which is the number of columns of a transition table.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the indices of all symbols.
    pub fn universe(&self) -> Range<SymbolIndex> {
        0..self.size()
    }

    /// Gives the name of the symbol at `index`.
    pub fn symbol(&self, index: SymbolIndex) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Looks up the position of the symbol with the given name.
    pub fn index_of(&self, name: &str) -> Option<SymbolIndex> {
        self.0.iter().position(|s| s == name)
    }

    /// Translates a word given as a sequence of symbol indices into a readable string.
    pub fn show_word(&self, word: &[SymbolIndex]) -> String {
        if word.is_empty() {
            return "ε".to_string();
        }
        word.iter()
            .map(|&i| self.symbol(i).map(str::to_string).unwrap_or_else(|| format!("#{i}")))
            .join(" ")
    }
}

impl std::ops::Index<SymbolIndex> for Alphabet {
    type Output = str;

    fn index(&self, index: SymbolIndex) -> &Self::Output {
        &self.0[index]
    }
}

impl<S: Into<String>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("[{}]", self.0.iter().join(", "))
    }
}
