use std::{fmt, str::FromStr};

use crate::error::FilterError;

/// A dense 2D grid of real-valued weights, stored row-major.
///
/// The convolution engine only accepts 3x3 kernels; other shapes can be built
/// but are rejected with [`FilterError::InvalidKernelShape`] when used.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "KernelRepr"))]
pub struct Kernel {
    rows: usize,
    cols: usize,
    weights: Vec<f32>,
}

// deserialized kernels go through `Kernel::new`
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct KernelRepr {
    rows: usize,
    cols: usize,
    weights: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<KernelRepr> for Kernel {
    type Error = FilterError;

    fn try_from(repr: KernelRepr) -> Result<Self, Self::Error> {
        Kernel::new(repr.rows, repr.cols, repr.weights)
    }
}

impl Kernel {
    /// Create a kernel from its shape and row-major weights.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKernelShape`] if a dimension is zero or the weights
    /// do not fill the shape.
    pub fn new(rows: usize, cols: usize, weights: Vec<f32>) -> Result<Self, FilterError> {
        if rows == 0 || cols == 0 || weights.len() != rows * cols {
            return Err(FilterError::InvalidKernelShape(rows, cols));
        }
        Ok(Self {
            rows,
            cols,
            weights,
        })
    }

    /// Create a 3x3 kernel from its rows.
    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self {
            rows: 3,
            cols: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// The (rows, cols) shape of the kernel.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The weight at (`row`, `col`), if inside the kernel.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.weights.get(row * self.cols + col).copied()
    }

    /// The sum of all the weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// The weights as a 3x3 matrix.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKernelShape`] unless the kernel is 3x3.
    pub fn as_3x3(&self) -> Result<[[f32; 3]; 3], FilterError> {
        if self.shape() != (3, 3) || self.weights.len() != 9 {
            return Err(FilterError::InvalidKernelShape(self.rows, self.cols));
        }
        let mut matrix = [[0.0; 3]; 3];
        matrix
            .iter_mut()
            .flatten()
            .zip(self.weights.iter())
            .for_each(|(m, &w)| *m = w);
        Ok(matrix)
    }
}

impl fmt::Display for Kernel {
    /// One line per row, every weight printed with three decimals and
    /// non-negative weights padded so the columns line up.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for (i, row) in self.weights.chunks_exact(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[ ")?;
            for &val in row {
                if val >= 0.0 {
                    write!(f, " {val:6.3} ")?;
                } else {
                    write!(f, "{val:6.3} ")?;
                }
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// The two weightings of the sharpen kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SharpenVariant {
    /// Center 5, the four orthogonal neighbours -1, corners 0.
    #[default]
    Orthogonal,
    /// Center 9, all eight neighbours -1.
    Full,
}

/// Create the 3x3 averaging kernel, every weight 1/9.
pub fn blur_kernel() -> Kernel {
    Kernel::from_rows([[1.0 / 9.0; 3]; 3])
}

/// Create a 3x3 sharpen kernel.
pub fn sharpen_kernel(variant: SharpenVariant) -> Kernel {
    match variant {
        SharpenVariant::Orthogonal => {
            Kernel::from_rows([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
        }
        SharpenVariant::Full => {
            Kernel::from_rows([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]])
        }
    }
}

/// Create the 3x3 discrete Laplacian, center 8 and all neighbours -1.
pub fn edge_kernel() -> Kernel {
    Kernel::from_rows([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
}

/// The predefined kernels a caller can select by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelKind {
    /// Simple average of the 3x3 neighbourhood.
    Blur,
    /// Center emphasis minus the neighbours.
    Sharpen(SharpenVariant),
    /// Discrete Laplacian edge detector.
    Edge,
}

impl KernelKind {
    /// The canonical kernels, in presentation order.
    pub const ALL: [KernelKind; 3] = [
        KernelKind::Blur,
        KernelKind::Sharpen(SharpenVariant::Orthogonal),
        KernelKind::Edge,
    ];

    /// The weights of this kernel.
    pub fn kernel(&self) -> Kernel {
        match self {
            KernelKind::Blur => blur_kernel(),
            KernelKind::Sharpen(variant) => sharpen_kernel(*variant),
            KernelKind::Edge => edge_kernel(),
        }
    }

    /// A human readable name for the kernel.
    pub fn display_name(&self) -> &'static str {
        match self {
            KernelKind::Blur => "Blur (Averaging)",
            KernelKind::Sharpen(_) => "Sharpen",
            KernelKind::Edge => "Edge Detection (Laplacian)",
        }
    }

    /// How the kernel works, what it does to an image and the per-pixel formula.
    pub fn explanation(&self) -> &'static str {
        match self {
            KernelKind::Blur => concat!(
                "How it works: every weight is 1/9, so each output pixel is the average ",
                "of its 8 neighbours plus itself.\n",
                "Effect: smooths sharp transitions between pixels, reducing noise.\n",
                "Formula: New_Pixel = (Sum of 9 neighbouring pixels) / 9"
            ),
            KernelKind::Sharpen(SharpenVariant::Orthogonal) => concat!(
                "How it works: the center pixel is weighted 5 while the four orthogonal ",
                "neighbours are subtracted, amplifying the difference to the surroundings.\n",
                "Effect: enhances edges and fine details.\n",
                "Formula: New_Pixel = 5×Center - (Top + Bottom + Left + Right)"
            ),
            KernelKind::Sharpen(SharpenVariant::Full) => concat!(
                "How it works: the center pixel is weighted 9 while all 8 neighbours are ",
                "subtracted, amplifying the difference to the surroundings.\n",
                "Effect: a stronger sharpening that also reacts to diagonal detail.\n",
                "Formula: New_Pixel = 9×Center - (Sum of 8 neighbours)"
            ),
            KernelKind::Edge => concat!(
                "How it works: the center pixel is weighted 8 while all 8 neighbours are ",
                "subtracted, highlighting rapid intensity changes.\n",
                "Effect: edges appear bright against a dark background, flat areas go black.\n",
                "Formula: New_Pixel = 8×Center - (Sum of 8 neighbours)"
            ),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelKind::Blur => "blur",
            KernelKind::Sharpen(SharpenVariant::Orthogonal) => "sharpen",
            KernelKind::Sharpen(SharpenVariant::Full) => "sharpen-full",
            KernelKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

impl FromStr for KernelKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blur" => Ok(KernelKind::Blur),
            "sharpen" => Ok(KernelKind::Sharpen(SharpenVariant::Orthogonal)),
            "sharpen-full" => Ok(KernelKind::Sharpen(SharpenVariant::Full)),
            "edge" => Ok(KernelKind::Edge),
            _ => Err(FilterError::UnknownKernel(s.to_string())),
        }
    }
}
