//! Named escape-time recurrences.
//!
//! Each recurrence is a zero-sized type, so a solver generic over
//! [`Recurrence`] is monomorphized per function and the inner loop carries
//! no dispatch. [`FunctionKind`] is the runtime name for one of them; the
//! render pipeline matches on it exactly once.
use std::fmt;

use tracing::warn;

use crate::complex::C;

/// One step of `z <- f(z, c)`. `c` is read-only; repetition and the escape
/// test belong to the solver.
pub trait Recurrence: Copy + Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn step(z: &mut C<f64>, c: C<f64>);
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ZSquared;

impl Recurrence for ZSquared {
    const NAME: &'static str = "z^2+c";

    #[inline(always)]
    fn step(z: &mut C<f64>, c: C<f64>) {
        let z1 = *z;
        *z *= z1;
        *z += c;
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ZCubed;

impl Recurrence for ZCubed {
    const NAME: &'static str = "z^3+c";

    #[inline(always)]
    fn step(z: &mut C<f64>, c: C<f64>) {
        let z1 = *z;
        *z *= z1;
        *z *= z1;
        *z += c;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    ZSquared,
    ZCubed,
}

/// Registry order matters: the first entry is the fallback.
pub const FUNCTIONS: &[(&str, FunctionKind)] = &[
    (ZSquared::NAME, FunctionKind::ZSquared),
    (ZCubed::NAME, FunctionKind::ZCubed),
];

impl FunctionKind {
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::ZSquared => ZSquared::NAME,
            FunctionKind::ZCubed => ZCubed::NAME,
        }
    }

    pub fn find(name: &str) -> Option<FunctionKind> {
        FUNCTIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    /// Like [`FunctionKind::find`], but never fails: no name, or an unknown
    /// one, selects the first registered function.
    pub fn lookup(name: Option<&str>) -> FunctionKind {
        let fallback = FUNCTIONS[0].1;
        match name {
            None => fallback,
            Some(name) => Self::find(name).unwrap_or_else(|| {
                warn!(
                    requested = name,
                    using = fallback.name(),
                    "unknown iteration function"
                );
                fallback
            }),
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        FUNCTIONS.iter().map(|(n, _)| *n)
    }
}

impl Default for FunctionKind {
    fn default() -> Self {
        FUNCTIONS[0].1
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
