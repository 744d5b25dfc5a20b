//! This module defines the [`Tape`], a logically infinite, bidirectional array of symbol ids
//! backed by a finite store that grows in fixed-size chunks.

use crate::alphabet::Alphabet;
use crate::types::{SymbolId, TuringMachineError, BLANK};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// Selects which cells are rendered when a tape is saved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// The whole backing store, blank padding included.
    #[default]
    Window,
    /// Only the cells between the leftmost and rightmost positions ever written.
    Written,
}

/// A tape addressed by signed positions.
///
/// Logical position `0` lives at physical index `offset`. Accesses outside the
/// backing store grow it by whole multiples of `growth_size`; growing to the
/// left shifts `offset` so that every previously written position keeps its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<SymbolId>,
    offset: usize,
    growth_size: usize,
    written: Option<(i64, i64)>,
}

impl Tape {
    /// Creates a blank tape of `initial_size` cells with logical `0` at the first cell.
    ///
    /// A `growth_size` of zero could never bring an out-of-window position into
    /// range and is rejected with `InvalidGrowthSize`.
    pub fn new(initial_size: usize, growth_size: usize) -> Result<Self, TuringMachineError> {
        if growth_size == 0 {
            return Err(TuringMachineError::InvalidGrowthSize(growth_size));
        }

        Ok(Self {
            cells: vec![BLANK; initial_size],
            offset: 0,
            growth_size,
            written: None,
        })
    }

    /// Creates a tape holding `names` at positions `0..names.len()`.
    ///
    /// The backing store starts at twice the number of symbols.
    pub fn from_symbols<I, S>(
        names: I,
        alphabet: &Alphabet,
        growth_size: usize,
    ) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = names
            .into_iter()
            .map(|name| alphabet.resolve(name.as_ref().trim()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tape = Self::new(symbols.len() * 2, growth_size)?;
        for (position, symbol) in symbols.into_iter().enumerate() {
            tape.write(symbol, position as i64);
        }

        Ok(tape)
    }

    /// Parses comma-separated symbol names, the format written by [`Tape::save`].
    pub fn parse(
        text: &str,
        alphabet: &Alphabet,
        growth_size: usize,
    ) -> Result<Self, TuringMachineError> {
        if text.trim().is_empty() {
            return Self::new(0, growth_size);
        }
        Self::from_symbols(text.split(','), alphabet, growth_size)
    }

    /// Returns the symbol at `position`, growing the store if the position is
    /// outside it. Never-written cells read as [`BLANK`].
    pub fn read(&mut self, position: i64) -> SymbolId {
        let index = self.ensure(position);
        self.cells[index]
    }

    /// Returns the symbol at `position` without growing the store.
    pub fn peek(&self, position: i64) -> SymbolId {
        self.physical(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(BLANK)
    }

    /// Stores `symbol` at `position`, growing the store first if needed.
    pub fn write(&mut self, symbol: SymbolId, position: i64) {
        let index = self.ensure(position);
        self.cells[index] = symbol;
        self.written = Some(match self.written {
            Some((min, max)) => (min.min(position), max.max(position)),
            None => (position, position),
        });
    }

    /// Number of allocated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Physical index of logical position `0`.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn growth_size(&self) -> usize {
        self.growth_size
    }

    /// Leftmost and rightmost logical positions ever written.
    pub fn written_extent(&self) -> Option<(i64, i64)> {
        self.written
    }

    /// Logical positions currently covered by the backing store.
    pub fn window(&self) -> std::ops::Range<i64> {
        let start = -(self.offset as i64);
        start..start + self.cells.len() as i64
    }

    /// The backing store in physical order.
    pub fn cells(&self) -> &[SymbolId] {
        &self.cells
    }

    /// Renders the tape as comma-separated symbol names in physical order.
    pub fn render(&self, alphabet: &Alphabet, extent: Extent) -> Result<String, TuringMachineError> {
        let cells = match (extent, self.written) {
            (Extent::Window, _) => &self.cells[..],
            (Extent::Written, None) => &[][..],
            (Extent::Written, Some((min, max))) => {
                // Written positions are always inside the window.
                let start = (min + self.offset as i64) as usize;
                let end = (max + self.offset as i64) as usize;
                &self.cells[start..=end]
            }
        };

        let names = cells
            .iter()
            .map(|&id| alphabet.name_of(id).ok_or(TuringMachineError::InvalidSymbolId(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names.join(","))
    }

    /// Writes [`Tape::render`] output to `writer`.
    pub fn save<W: Write>(
        &self,
        mut writer: W,
        alphabet: &Alphabet,
        extent: Extent,
    ) -> Result<(), TuringMachineError> {
        let text = self.render(alphabet, extent)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| TuringMachineError::FileError(format!("Failed to save tape: {}", e)))
    }

    /// Captures the complete tape layout.
    pub fn image(&self) -> TapeImage {
        TapeImage {
            cells: self.cells.clone(),
            offset: self.offset,
            growth_size: self.growth_size,
            written: self.written,
        }
    }

    /// Rebuilds a tape from an image, validating its layout.
    pub fn from_image(image: TapeImage) -> Result<Self, TuringMachineError> {
        if image.growth_size == 0 {
            return Err(TuringMachineError::InvalidGrowthSize(0));
        }
        if image.offset > image.cells.len() {
            return Err(TuringMachineError::CheckpointError(format!(
                "Tape offset {} exceeds tape length {}",
                image.offset,
                image.cells.len()
            )));
        }

        let tape = Self {
            cells: image.cells,
            offset: image.offset,
            growth_size: image.growth_size,
            written: image.written,
        };

        if let Some((min, max)) = tape.written {
            let window = tape.window();
            if min > max || !window.contains(&min) || !window.contains(&max) {
                return Err(TuringMachineError::CheckpointError(format!(
                    "Written extent {}..={} lies outside the tape window {:?}",
                    min, max, window
                )));
            }
        }

        Ok(tape)
    }

    fn physical(&self, position: i64) -> Option<usize> {
        usize::try_from(position + self.offset as i64).ok()
    }

    /// Grows the store until `position` fits and returns its physical index.
    ///
    /// The number of chunks is computed from the distance outside the window and
    /// allocated in one step, so a single far access costs time proportional to
    /// that distance only.
    fn ensure(&mut self, position: i64) -> usize {
        let physical = position + self.offset as i64;

        if physical < 0 {
            let chunks = (physical.unsigned_abs() as usize).div_ceil(self.growth_size);
            self.grow_left(chunks);
        } else if physical as usize >= self.cells.len() {
            let missing = physical as usize - self.cells.len() + 1;
            self.grow_right(missing.div_ceil(self.growth_size));
        }

        (position + self.offset as i64) as usize
    }

    fn grow_left(&mut self, chunks: usize) {
        let extra = chunks * self.growth_size;
        self.cells
            .splice(0..0, std::iter::repeat(BLANK).take(extra));
        self.offset += extra;
        debug!(cells = extra, len = self.cells.len(), offset = self.offset, "tape grew left");
    }

    fn grow_right(&mut self, chunks: usize) {
        let extra = chunks * self.growth_size;
        self.cells.resize(self.cells.len() + extra, BLANK);
        debug!(cells = extra, len = self.cells.len(), "tape grew right");
    }
}

/// A serializable copy of a [`Tape`]'s layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeImage {
    pub cells: Vec<SymbolId>,
    pub offset: usize,
    pub growth_size: usize,
    #[serde(default)]
    pub written: Option<(i64, i64)>,
}
