use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

use crate::error::{Error, Result};
use crate::math::element::Element;

/// Dense row-major array with a compile-time rank and a runtime shape.
///
/// The last axis varies fastest. `size()` always equals the product of
/// `shape()`. Arithmetic, `transpose_2d` and `matrix_product` return new
/// tensors; `fill`, `assign`, indexing and `reshape` mutate in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T, const RANK: usize> {
    data: Vec<T>,
    shape: [usize; RANK],
}

impl<T: Element, const RANK: usize> Tensor<T, RANK> {
    /// Builds a zero-filled tensor from exactly `RANK` extents.
    pub fn new(extents: &[usize]) -> Result<Self> {
        if extents.len() != RANK {
            return Err(Error::DimensionMismatch {
                expected: RANK,
                got: extents.len(),
            });
        }
        let mut shape = [0; RANK];
        shape.copy_from_slice(extents);
        Ok(Self::zeros(shape))
    }

    pub fn zeros(shape: [usize; RANK]) -> Self {
        Self::full(shape, T::zero())
    }

    pub fn full(shape: [usize; RANK], value: T) -> Self {
        let size = shape.iter().product();
        Tensor {
            data: vec![value; size],
            shape,
        }
    }

    /// Wraps an existing row-major buffer; its length must match the shape.
    pub fn from_vec(shape: [usize; RANK], data: Vec<T>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ElementCount {
                expected,
                got: data.len(),
            });
        }
        Ok(Tensor { data, shape })
    }

    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// Overwrites every element from a flat row-major sequence.
    pub fn assign(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.data.len() {
            return Err(Error::ElementCount {
                expected: self.data.len(),
                got: values.len(),
            });
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// Adopts a new shape over the existing buffer.
    ///
    /// This is lossy and one-directional: a smaller shape permanently drops
    /// the trailing elements, and a later reshape can never grow past what
    /// is still stored.
    pub fn reshape(&mut self, extents: &[usize]) -> Result<()> {
        if extents.len() != RANK {
            return Err(Error::DimensionMismatch {
                expected: RANK,
                got: extents.len(),
            });
        }
        let requested: usize = extents.iter().product();
        if requested > self.data.len() {
            return Err(Error::ReshapeExceedsStorage {
                requested,
                available: self.data.len(),
            });
        }
        self.shape.copy_from_slice(extents);
        self.data.truncate(requested);
        Ok(())
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape,
        }
    }

    /// Elementwise combination of two tensors of identical shape.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape != other.shape {
            return Err(Error::ShapeMismatch {
                expected: self.shape.to_vec(),
                got: other.shape.to_vec(),
            });
        }
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            shape: self.shape,
        })
    }
}

impl<T, const RANK: usize> Tensor<T, RANK> {
    pub fn shape(&self) -> [usize; RANK] {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn flat_index(&self, index: &[usize; RANK]) -> usize {
        let mut flat = 0;
        let mut stride = 1;
        for axis in (0..RANK).rev() {
            debug_assert!(
                index[axis] < self.shape[axis],
                "index {} out of range for axis {} with extent {}",
                index[axis],
                axis,
                self.shape[axis]
            );
            flat += index[axis] * stride;
            stride *= self.shape[axis];
        }
        flat
    }
}

impl<T: Element> Tensor<T, 2> {
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// Copies row `i` into a new 1×N tensor.
    pub fn row(&self, i: usize) -> Tensor<T, 2> {
        let cols = self.cols();
        let start = i * cols;
        Tensor {
            data: self.data[start..start + cols].to_vec(),
            shape: [1, cols],
        }
    }

    /// Overwrites row `i` with the contents of a 1×N tensor.
    pub fn set_row(&mut self, i: usize, row: &Tensor<T, 2>) -> Result<()> {
        let cols = self.cols();
        if row.shape != [1, cols] {
            return Err(Error::ShapeMismatch {
                expected: vec![1, cols],
                got: row.shape.to_vec(),
            });
        }
        let start = i * cols;
        self.data[start..start + cols].copy_from_slice(&row.data);
        Ok(())
    }
}

impl<T, const RANK: usize> Index<[usize; RANK]> for Tensor<T, RANK> {
    type Output = T;

    fn index(&self, index: [usize; RANK]) -> &T {
        &self.data[self.flat_index(&index)]
    }
}

impl<T, const RANK: usize> IndexMut<[usize; RANK]> for Tensor<T, RANK> {
    fn index_mut(&mut self, index: [usize; RANK]) -> &mut T {
        let flat = self.flat_index(&index);
        &mut self.data[flat]
    }
}

/// Dense matrix product with plain triple-loop accumulation.
pub fn matrix_product<T: Element>(a: &Tensor<T, 2>, b: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
    let [m, k1] = a.shape;
    let [k2, n] = b.shape;
    if k1 != k2 {
        return Err(Error::MatmulShape { m, k1, k2, n });
    }

    let mut res = Tensor::zeros([m, n]);
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for k in 0..k1 {
                sum = sum + a.data[i * k1 + k] * b.data[k * n + j];
            }
            res.data[i * n + j] = sum;
        }
    }
    Ok(res)
}

/// Swaps the last two axes. For rank 2 this is the ordinary transpose.
pub fn transpose_2d<T: Element, const RANK: usize>(t: &Tensor<T, RANK>) -> Result<Tensor<T, RANK>> {
    let (Some(outer), Some(inner)) = (RANK.checked_sub(2), RANK.checked_sub(1)) else {
        return Err(Error::RankTooLow { rank: RANK });
    };

    let mut new_shape = t.shape;
    new_shape.swap(outer, inner);
    let mut res = Tensor::zeros(new_shape);

    let mut index = [0usize; RANK];
    for (flat, &value) in t.data.iter().enumerate() {
        let mut rem = flat;
        for axis in (0..RANK).rev() {
            index[axis] = rem % t.shape[axis];
            rem /= t.shape[axis];
        }
        index.swap(outer, inner);
        let dst = res.flat_index(&index);
        res.data[dst] = value;
    }
    Ok(res)
}

// ---------------------------------------------------------------------------
// Scalar arithmetic
// ---------------------------------------------------------------------------

macro_rules! tensor_scalar_op {
    ($op_trait:ident, $method:ident, $op:tt) => {
        impl<T: Element, const RANK: usize> $op_trait<T> for Tensor<T, RANK> {
            type Output = Tensor<T, RANK>;

            fn $method(mut self, rhs: T) -> Self::Output {
                self.data.iter_mut().for_each(|v| *v = *v $op rhs);
                self
            }
        }

        impl<T: Element, const RANK: usize> $op_trait<T> for &Tensor<T, RANK> {
            type Output = Tensor<T, RANK>;

            fn $method(self, rhs: T) -> Self::Output {
                self.map(|v| v $op rhs)
            }
        }
    };
}

tensor_scalar_op!(Add, add, +);
tensor_scalar_op!(Sub, sub, -);
tensor_scalar_op!(Mul, mul, *);
tensor_scalar_op!(Div, div, /);

// Orphan rules forbid a blanket `impl<T> Add<Tensor<T, R>> for T`, so the
// scalar-on-the-left forms are spelled out per element type.
macro_rules! scalar_tensor_op {
    ($scalar:ty, $op_trait:ident, $method:ident, $op:tt) => {
        impl<const RANK: usize> $op_trait<Tensor<$scalar, RANK>> for $scalar {
            type Output = Tensor<$scalar, RANK>;

            fn $method(self, mut rhs: Tensor<$scalar, RANK>) -> Self::Output {
                rhs.data.iter_mut().for_each(|v| *v = self $op *v);
                rhs
            }
        }

        impl<const RANK: usize> $op_trait<&Tensor<$scalar, RANK>> for $scalar {
            type Output = Tensor<$scalar, RANK>;

            fn $method(self, rhs: &Tensor<$scalar, RANK>) -> Self::Output {
                rhs.map(|v| self $op v)
            }
        }
    };
}

macro_rules! scalar_tensor_ops {
    ($($scalar:ty),*) => {
        $(
            scalar_tensor_op!($scalar, Add, add, +);
            scalar_tensor_op!($scalar, Sub, sub, -);
            scalar_tensor_op!($scalar, Mul, mul, *);
            scalar_tensor_op!($scalar, Div, div, /);
        )*
    };
}

scalar_tensor_ops!(f32, f64);

// ---------------------------------------------------------------------------
// Debug rendering
// ---------------------------------------------------------------------------

impl<T: fmt::Display, const RANK: usize> Tensor<T, RANK> {
    fn fmt_axis(
        &self,
        f: &mut fmt::Formatter<'_>,
        axis: usize,
        offset: usize,
        indent: usize,
    ) -> fmt::Result {
        let pad = " ".repeat(indent);
        if axis + 1 == RANK {
            write!(f, "{pad}")?;
            for i in 0..self.shape[axis] {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.data[offset + i])?;
            }
            return Ok(());
        }

        let stride: usize = self.shape[axis + 1..].iter().product();
        writeln!(f, "{pad}{{")?;
        for i in 0..self.shape[axis] {
            self.fmt_axis(f, axis + 1, offset + i * stride, indent + 2)?;
            writeln!(f)?;
        }
        write!(f, "{pad}}}")
    }
}

impl<T: fmt::Display, const RANK: usize> fmt::Display for Tensor<T, RANK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if RANK == 0 {
            return match self.data.first() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            };
        }
        self.fmt_axis(f, 0, 0, 0)
    }
}
