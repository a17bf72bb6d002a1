/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Concrete operation families for [`crate::delayed::isometric`]:
//! arithmetic, boolean, and comparison, in their unary-scalar,
//! unary-vector, and binary forms.

use std::ops::{Add, Div, Mul, Rem, Sub};

use num_traits::Zero;

use crate::delayed::isometric::{BinaryOp, UnaryOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
    IntegerDivide,
}

/// A per-scalar arithmetic operation: `ADD, SUBTRACT, MULTIPLY, DIVIDE,
/// POWER, MODULO, INTEGER_DIVIDE`, with a `right` flag selecting whether
/// the scalar is the right operand (`x op c`) or the left (`c op x`).
pub struct ArithmeticScalar<V> {
    pub kind: ArithmeticKind,
    pub scalar: V,
    pub scalar_on_right: bool,
}

impl<V> ArithmeticScalar<V>
where
    V: Copy + PartialEq + PartialOrd + Zero + num_traits::One
        + Add<Output = V> + Sub<Output = V> + Mul<Output = V> + Div<Output = V>
        + Rem<Output = V> + num_traits::Pow<V, Output = V>,
{
    fn eval(&self, x: V) -> V {
        let (l, r) = if self.scalar_on_right { (x, self.scalar) } else { (self.scalar, x) };
        match self.kind {
            ArithmeticKind::Add => l + r,
            ArithmeticKind::Subtract => l - r,
            ArithmeticKind::Multiply => l * r,
            ArithmeticKind::Divide => l / r,
            ArithmeticKind::Power => l.pow(r),
            ArithmeticKind::Modulo => floored_mod(l, r),
            ArithmeticKind::IntegerDivide => floored_div(l, r),
        }
    }
}

/// `x mod y` by floored division: the remainder lies in `[0, y)` for
/// positive `y`, matching mathematical convention rather than C-style
/// truncation toward zero.
fn floored_mod<V>(x: V, y: V) -> V
where
    V: Copy + PartialOrd + Zero + Rem<Output = V> + Add<Output = V>,
{
    let r = x % y;
    if (r < V::zero() && y > V::zero()) || (r > V::zero() && y < V::zero()) {
        r + y
    } else {
        r
    }
}

fn floored_div<V>(x: V, y: V) -> V
where
    V: Copy + PartialOrd + Zero + num_traits::One + Rem<Output = V> + Sub<Output = V> + Div<Output = V> + Add<Output = V>,
{
    let q = x / y;
    let r = x % y;
    if (r < V::zero() && y > V::zero()) || (r > V::zero() && y < V::zero()) {
        q - V::one()
    } else {
        q
    }
}

impl<V> UnaryOp<V> for ArithmeticScalar<V>
where
    V: Copy + PartialEq + PartialOrd + Zero + num_traits::One + Send + Sync
        + Add<Output = V> + Sub<Output = V> + Mul<Output = V> + Div<Output = V>
        + Rem<Output = V> + num_traits::Pow<V, Output = V>,
{
    fn apply(&self, _row: bool, _i: usize, _secondary: usize, value: V) -> V {
        self.eval(value)
    }

    fn fill(&self, _row: bool, _i: usize) -> V {
        self.eval(V::zero())
    }

    fn is_sparse(&self) -> bool {
        match self.kind {
            ArithmeticKind::Multiply => true,
            ArithmeticKind::Divide => self.scalar_on_right && !self.scalar.is_zero(),
            ArithmeticKind::Add
            | ArithmeticKind::Subtract
            | ArithmeticKind::Power
            | ArithmeticKind::Modulo
            | ArithmeticKind::IntegerDivide => self.eval(V::zero()).is_zero(),
        }
    }
}

/// Per-row or per-column arithmetic: the scalar in [`ArithmeticScalar`] is
/// replaced by a vector indexed by the row (if `vector_is_row`) or column
/// identity of the element being transformed.
pub struct ArithmeticVector<V> {
    pub kind: ArithmeticKind,
    pub vector: Vec<V>,
    pub vector_is_row: bool,
    pub scalar_on_right: bool,
}

impl<V> ArithmeticVector<V>
where
    V: Copy + PartialEq + PartialOrd + Zero + num_traits::One
        + Add<Output = V> + Sub<Output = V> + Mul<Output = V> + Div<Output = V>
        + Rem<Output = V> + num_traits::Pow<V, Output = V>,
{
    fn scalar_for(&self, row: bool, i: usize, secondary: usize) -> V {
        let position = if self.vector_is_row == row { i } else { secondary };
        self.vector[position]
    }

    fn eval(&self, scalar: V, x: V) -> V {
        let (l, r) = if self.scalar_on_right { (x, scalar) } else { (scalar, x) };
        match self.kind {
            ArithmeticKind::Add => l + r,
            ArithmeticKind::Subtract => l - r,
            ArithmeticKind::Multiply => l * r,
            ArithmeticKind::Divide => l / r,
            ArithmeticKind::Power => l.pow(r),
            ArithmeticKind::Modulo => floored_mod(l, r),
            ArithmeticKind::IntegerDivide => floored_div(l, r),
        }
    }
}

impl<V> UnaryOp<V> for ArithmeticVector<V>
where
    V: Copy + PartialEq + PartialOrd + Zero + num_traits::One + Send + Sync
        + Add<Output = V> + Sub<Output = V> + Mul<Output = V> + Div<Output = V>
        + Rem<Output = V> + num_traits::Pow<V, Output = V>,
{
    fn apply(&self, row: bool, i: usize, secondary: usize, value: V) -> V {
        let scalar = self.scalar_for(row, i, secondary);
        self.eval(scalar, value)
    }

    fn fill(&self, row: bool, i: usize) -> V {
        // `fill` only varies with one dimension's identity; when the
        // vector runs along `row` this is exact for row-extraction and the
        // caller is responsible for invoking the correct secondary-aware
        // expansion when it does not.
        let scalar = if self.vector_is_row == row { self.vector[i] } else { return V::zero() };
        self.eval(scalar, V::zero())
    }

    fn is_sparse(&self) -> bool {
        match self.kind {
            ArithmeticKind::Multiply => true,
            _ => self.vector.iter().all(|&c| {
                let (l, r) = if self.scalar_on_right { (V::zero(), c) } else { (c, V::zero()) };
                match self.kind {
                    ArithmeticKind::Add => (l + r).is_zero(),
                    ArithmeticKind::Subtract => (l - r).is_zero(),
                    ArithmeticKind::Divide => self.scalar_on_right && !c.is_zero(),
                    ArithmeticKind::Power => l.pow(r).is_zero(),
                    ArithmeticKind::Modulo => floored_mod(l, r).is_zero(),
                    ArithmeticKind::IntegerDivide => c != V::zero() && floored_div(l, r).is_zero(),
                    ArithmeticKind::Multiply => unreachable!(),
                }
            }),
        }
    }

    fn zero_depends_on_row(&self) -> bool {
        self.vector_is_row
    }

    fn zero_depends_on_column(&self) -> bool {
        !self.vector_is_row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    And,
    Or,
    Xor,
    Equal,
    Not,
    Cast,
}

pub struct BooleanUnary {
    pub kind: BooleanKind,
    pub operand: bool,
}

fn to_bool<V: PartialEq + Zero>(v: V) -> bool {
    !v.is_zero()
}

fn from_bool<V: Zero + num_traits::One>(b: bool) -> V {
    if b { V::one() } else { V::zero() }
}

impl<V: Copy + PartialEq + Zero + num_traits::One + Send + Sync> UnaryOp<V> for BooleanUnary {
    fn apply(&self, _row: bool, _i: usize, _secondary: usize, value: V) -> V {
        let x = to_bool(value);
        let out = match self.kind {
            BooleanKind::And => x && self.operand,
            BooleanKind::Or => x || self.operand,
            BooleanKind::Xor => x ^ self.operand,
            BooleanKind::Equal => x == self.operand,
            BooleanKind::Not => !x,
            BooleanKind::Cast => x,
        };
        from_bool(out)
    }

    fn fill(&self, _row: bool, _i: usize) -> V {
        self.apply(true, 0, 0, V::zero())
    }

    fn is_sparse(&self) -> bool {
        match self.kind {
            BooleanKind::And | BooleanKind::Cast => true,
            BooleanKind::Or | BooleanKind::Xor => !self.operand,
            BooleanKind::Equal | BooleanKind::Not => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

pub struct ComparisonScalar<V> {
    pub kind: ComparisonKind,
    pub scalar: V,
    pub scalar_on_right: bool,
}

impl<V: Copy + PartialOrd + Zero + num_traits::One + Send + Sync> UnaryOp<V> for ComparisonScalar<V> {
    fn apply(&self, _row: bool, _i: usize, _secondary: usize, value: V) -> V {
        let (l, r) = if self.scalar_on_right { (value, self.scalar) } else { (self.scalar, value) };
        let out = match self.kind {
            ComparisonKind::Equal => l == r,
            ComparisonKind::NotEqual => l != r,
            ComparisonKind::Less => l < r,
            ComparisonKind::Greater => l > r,
            ComparisonKind::LessEqual => l <= r,
            ComparisonKind::GreaterEqual => l >= r,
        };
        from_bool(out)
    }

    fn fill(&self, _row: bool, _i: usize) -> V {
        self.apply(true, 0, 0, V::zero())
    }

    fn is_sparse(&self) -> bool {
        self.apply(true, 0, 0, V::zero()).is_zero()
    }
}

/// Binary arithmetic pairing corresponding entries of two matrices.
pub struct ArithmeticBinary {
    pub kind: ArithmeticKind,
}

impl<V> BinaryOp<V> for ArithmeticBinary
where
    V: Copy + PartialEq + PartialOrd + Zero + num_traits::One + Send + Sync
        + Add<Output = V> + Sub<Output = V> + Mul<Output = V> + Div<Output = V>
        + Rem<Output = V> + num_traits::Pow<V, Output = V>,
{
    fn apply(&self, l: V, r: V) -> V {
        match self.kind {
            ArithmeticKind::Add => l + r,
            ArithmeticKind::Subtract => l - r,
            ArithmeticKind::Multiply => l * r,
            ArithmeticKind::Divide => l / r,
            ArithmeticKind::Power => l.pow(r),
            ArithmeticKind::Modulo => floored_mod(l, r),
            ArithmeticKind::IntegerDivide => floored_div(l, r),
        }
    }

    fn is_sparse(&self) -> bool {
        matches!(self.kind, ArithmeticKind::Add | ArithmeticKind::Subtract | ArithmeticKind::Multiply)
    }

    fn must_have_both(&self) -> bool {
        !matches!(self.kind, ArithmeticKind::Multiply)
    }
}

pub struct BooleanBinary {
    pub kind: BooleanKind,
}

impl<V: Copy + PartialEq + Zero + num_traits::One + Send + Sync> BinaryOp<V> for BooleanBinary {
    fn apply(&self, l: V, r: V) -> V {
        let (a, b) = (to_bool(l), to_bool(r));
        let out = match self.kind {
            BooleanKind::And => a && b,
            BooleanKind::Or => a || b,
            BooleanKind::Xor => a ^ b,
            BooleanKind::Equal => a == b,
            BooleanKind::Not | BooleanKind::Cast => unreachable!("unary-only boolean kind used in binary context"),
        };
        from_bool(out)
    }

    fn is_sparse(&self) -> bool {
        matches!(self.kind, BooleanKind::And | BooleanKind::Or | BooleanKind::Xor)
    }
}

pub struct ComparisonBinary {
    pub kind: ComparisonKind,
}

impl<V: Copy + PartialOrd + Zero + num_traits::One + Send + Sync> BinaryOp<V> for ComparisonBinary {
    fn apply(&self, l: V, r: V) -> V {
        let out = match self.kind {
            ComparisonKind::Equal => l == r,
            ComparisonKind::NotEqual => l != r,
            ComparisonKind::Less => l < r,
            ComparisonKind::Greater => l > r,
            ComparisonKind::LessEqual => l <= r,
            ComparisonKind::GreaterEqual => l >= r,
        };
        from_bool(out)
    }

    fn is_sparse(&self) -> bool {
        matches!(self.kind, ComparisonKind::NotEqual | ComparisonKind::Less | ComparisonKind::Greater)
    }
}
