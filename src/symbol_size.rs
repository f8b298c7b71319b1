//! The production symbol catalog of ISO/IEC 16022.
//!
//! The encoder only ever asks one question: "what is the smallest symbol
//! that holds `n` data codewords under the caller's constraints?". The
//! catalog below is ordered by data capacity so a linear scan answers it.

/// Shape preference for the automatic symbol selection.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SymbolShape {
    /// Consider every symbol, square or rectangular.
    #[default]
    None,
    /// Consider square symbols only.
    Square,
    /// Consider rectangular symbols only.
    Rectangle,
}

/// A symbol size in modules, used for the min/max constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub width: u16,
    pub height: u16,
}

impl Dimension {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Descriptor of one Data Matrix symbol layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    width: u16,
    height: u16,
    data_capacity: u16,
}

// Overall module counts including the finder pattern, and the number of
// data codewords before error correction. Rectangles interleave with the
// squares in data capacity order.
#[rustfmt::skip]
const SYMBOLS: [SymbolInfo; 30] = [
    SymbolInfo::new(10, 10, 3),
    SymbolInfo::new(12, 12, 5),
    SymbolInfo::new(18, 8, 5),
    SymbolInfo::new(14, 14, 8),
    SymbolInfo::new(32, 8, 10),
    SymbolInfo::new(16, 16, 12),
    SymbolInfo::new(26, 12, 16),
    SymbolInfo::new(18, 18, 18),
    SymbolInfo::new(20, 20, 22),
    SymbolInfo::new(36, 12, 22),
    SymbolInfo::new(22, 22, 30),
    SymbolInfo::new(36, 16, 32),
    SymbolInfo::new(24, 24, 36),
    SymbolInfo::new(26, 26, 44),
    SymbolInfo::new(48, 16, 49),
    SymbolInfo::new(32, 32, 62),
    SymbolInfo::new(36, 36, 86),
    SymbolInfo::new(40, 40, 114),
    SymbolInfo::new(44, 44, 144),
    SymbolInfo::new(48, 48, 174),
    SymbolInfo::new(52, 52, 204),
    SymbolInfo::new(64, 64, 280),
    SymbolInfo::new(72, 72, 368),
    SymbolInfo::new(80, 80, 456),
    SymbolInfo::new(88, 88, 576),
    SymbolInfo::new(96, 96, 696),
    SymbolInfo::new(104, 104, 816),
    SymbolInfo::new(120, 120, 1050),
    SymbolInfo::new(132, 132, 1304),
    SymbolInfo::new(144, 144, 1558),
];

impl SymbolInfo {
    const fn new(width: u16, height: u16, data_capacity: u16) -> Self {
        Self {
            width,
            height,
            data_capacity,
        }
    }

    /// Overall symbol width in modules.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Overall symbol height in modules.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of data codewords the symbol holds before error correction.
    pub fn data_capacity(&self) -> usize {
        self.data_capacity as usize
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Find the smallest symbol that holds `required` data codewords.
    ///
    /// `shape` restricts the candidates to squares or rectangles, `min_size`
    /// and `max_size` bound the overall module counts. Returns `None` if no
    /// production symbol satisfies all constraints.
    pub fn lookup(
        required: usize,
        shape: SymbolShape,
        min_size: Option<Dimension>,
        max_size: Option<Dimension>,
    ) -> Option<&'static SymbolInfo> {
        SYMBOLS.iter().find(|symbol| {
            let shape_ok = match shape {
                SymbolShape::None => true,
                SymbolShape::Square => symbol.is_square(),
                SymbolShape::Rectangle => !symbol.is_square(),
            };
            if !shape_ok {
                return false;
            }
            if let Some(min) = min_size {
                if symbol.width < min.width || symbol.height < min.height {
                    return false;
                }
            }
            if let Some(max) = max_size {
                if symbol.width > max.width || symbol.height > max.height {
                    return false;
                }
            }
            symbol.data_capacity() >= required
        })
    }
}
