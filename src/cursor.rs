//! Deterministic traversal over the color channels of a carrier grid.
//!
//! Writer and reader share no state except this order: rows top to bottom,
//! pixels left to right within a row, and red, green, blue within a pixel.
//! Alpha is never visited.

use crate::grid::CarrierGrid;

/// Color channel carrying one payload byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Traversal order within one pixel.
    pub const ORDER: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// One channel sample position in a carrier grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub x: usize,
    pub y: usize,
    pub channel: Channel,
}

/// Finite, non-restartable walk over every `(pixel, channel)` pair.
///
/// Once `y == height` the cursor is exhausted and stays exhausted.
#[derive(Clone, Debug)]
pub struct ChannelCursor {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    channel: usize,
}

impl ChannelCursor {
    pub fn new(width: usize, height: usize) -> Self {
        // A zero-width grid has no samples at all.
        let y = if width == 0 { height } else { 0 };
        Self {
            width,
            height,
            x: 0,
            y,
            channel: 0,
        }
    }

    pub fn for_grid(grid: &CarrierGrid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    pub fn is_exhausted(&self) -> bool {
        self.y >= self.height
    }

    /// Samples not yet visited.
    pub fn remaining(&self) -> usize {
        if self.is_exhausted() {
            return 0;
        }
        let rows_after = self.height - self.y - 1;
        let in_row = (self.width - self.x) * 3 - self.channel;
        rows_after * self.width * 3 + in_row
    }
}

impl Iterator for ChannelCursor {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.is_exhausted() {
            return None;
        }
        let slot = Slot {
            x: self.x,
            y: self.y,
            channel: Channel::ORDER[self.channel],
        };

        self.channel += 1;
        if self.channel == 3 {
            self.channel = 0;
            self.x += 1;
            if self.x == self.width {
                self.x = 0;
                self.y += 1;
            }
        }
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChannelCursor {}

impl core::iter::FusedIterator for ChannelCursor {}

/// Low 8 bits of the sample at `slot`.
pub fn peek_low_byte(grid: &CarrierGrid, slot: Slot) -> u8 {
    let px = grid.pixel(slot.x, slot.y);
    let sample = match slot.channel {
        Channel::Red => px.r,
        Channel::Green => px.g,
        Channel::Blue => px.b,
    };
    (sample & 0x00FF) as u8
}

/// Replace the low 8 bits of the sample at `slot`, keeping any higher bits.
pub fn set_low_byte(grid: &mut CarrierGrid, slot: Slot, value: u8) {
    let px = grid.pixel_mut(slot.x, slot.y);
    let sample = match slot.channel {
        Channel::Red => &mut px.r,
        Channel::Green => &mut px.g,
        Channel::Blue => &mut px.b,
    };
    *sample = (*sample & 0xFF00) | u16::from(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SampleDepth;
    use rgb::RGBA16;

    #[test]
    fn visits_channels_then_columns_then_rows() {
        let slots: Vec<_> = ChannelCursor::new(2, 2)
            .map(|s| (s.x, s.y, s.channel.index()))
            .collect();
        assert_eq!(
            slots,
            vec![
                (0, 0, 0),
                (0, 0, 1),
                (0, 0, 2),
                (1, 0, 0),
                (1, 0, 1),
                (1, 0, 2),
                (0, 1, 0),
                (0, 1, 1),
                (0, 1, 2),
                (1, 1, 0),
                (1, 1, 1),
                (1, 1, 2),
            ]
        );
    }

    #[test]
    fn stays_exhausted() {
        let mut cursor = ChannelCursor::new(1, 1);
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.by_ref().count(), 3);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn remaining_tracks_progress() {
        let mut cursor = ChannelCursor::new(5, 3);
        assert_eq!(cursor.remaining(), 45);
        for expected in (0..45).rev() {
            cursor.next();
            assert_eq!(cursor.remaining(), expected);
        }
    }

    #[test]
    fn empty_grids_yield_nothing() {
        assert_eq!(ChannelCursor::new(0, 4).count(), 0);
        assert_eq!(ChannelCursor::new(4, 0).count(), 0);
    }

    #[test]
    fn set_low_byte_keeps_high_bits() {
        let mut grid = CarrierGrid::from_fn(1, 1, SampleDepth::Sixteen, false, |_, _| {
            RGBA16::new(0xAB12, 0xCD34, 0xEF56, 0xFFFF)
        });
        let slot = Slot {
            x: 0,
            y: 0,
            channel: Channel::Green,
        };
        set_low_byte(&mut grid, slot, 0x99);
        assert_eq!(grid.pixel(0, 0), RGBA16::new(0xAB12, 0xCD99, 0xEF56, 0xFFFF));
        assert_eq!(peek_low_byte(&grid, slot), 0x99);
    }

    #[test]
    fn eight_bit_samples_are_replaced_whole() {
        let mut grid =
            CarrierGrid::from_fn(1, 1, SampleDepth::Eight, false, |_, _| RGBA16::new(1, 2, 3, 255));
        let slot = Slot {
            x: 0,
            y: 0,
            channel: Channel::Blue,
        };
        set_low_byte(&mut grid, slot, 200);
        assert_eq!(grid.pixel(0, 0).b, 200);
    }
}
