//! Terminal algebras.
//!
//! Every diagram maps points to values of some lattice. The [`Lattice`] trait
//! is the capability the manager needs from the terminal type: bounds,
//! meet/join, a partial order, and an equality/hash pair used to deduplicate
//! terminals (which may differ from the type's own `PartialEq`).

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr};

use crate::utils::mhash;

/// Result of comparing two elements of a partial order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LatticeOrd {
    Equal,
    Less,
    Greater,
    Unordered,
}

impl LatticeOrd {
    /// Swap `Less` and `Greater`.
    pub const fn flip(self) -> Self {
        match self {
            LatticeOrd::Less => LatticeOrd::Greater,
            LatticeOrd::Greater => LatticeOrd::Less,
            other => other,
        }
    }

    pub const fn is_le(self) -> bool {
        matches!(self, LatticeOrd::Less | LatticeOrd::Equal)
    }

    pub const fn is_ge(self) -> bool {
        matches!(self, LatticeOrd::Greater | LatticeOrd::Equal)
    }
}

/// Intersection of orderings: the relation that holds on both parts.
impl BitAnd for LatticeOrd {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (LatticeOrd::Equal, x) | (x, LatticeOrd::Equal) => x,
            (LatticeOrd::Unordered, _) | (_, LatticeOrd::Unordered) => LatticeOrd::Unordered,
            (x, y) if x == y => x,
            _ => LatticeOrd::Unordered,
        }
    }
}

/// Union of orderings: the relation that holds on either part.
impl BitOr for LatticeOrd {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (LatticeOrd::Equal, x) | (x, LatticeOrd::Equal) => x,
            (LatticeOrd::Unordered, x) | (x, LatticeOrd::Unordered) => x,
            (x, y) if x == y => x,
            _ => LatticeOrd::Equal,
        }
    }
}

impl From<Ordering> for LatticeOrd {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => LatticeOrd::Less,
            Ordering::Equal => LatticeOrd::Equal,
            Ordering::Greater => LatticeOrd::Greater,
        }
    }
}

impl From<LatticeOrd> for Option<Ordering> {
    fn from(ord: LatticeOrd) -> Self {
        match ord {
            LatticeOrd::Less => Some(Ordering::Less),
            LatticeOrd::Equal => Some(Ordering::Equal),
            LatticeOrd::Greater => Some(Ordering::Greater),
            LatticeOrd::Unordered => None,
        }
    }
}

impl Display for LatticeOrd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LatticeOrd::Equal => "=",
            LatticeOrd::Less => "<",
            LatticeOrd::Greater => ">",
            LatticeOrd::Unordered => "<>",
        };
        write!(f, "{}", s)
    }
}

/// Algebra over the terminal type `T`.
pub trait Lattice<T> {
    fn bottom(&self) -> T;
    fn top(&self) -> T;

    fn least_upper_bound(&self, x: &T, y: &T) -> T;
    fn greatest_lower_bound(&self, x: &T, y: &T) -> T;

    fn compare(&self, x: &T, y: &T) -> LatticeOrd;
    fn equal(&self, x: &T, y: &T) -> bool;
    fn hash(&self, x: &T) -> u64;
}

/// The natural total order of primitive types.
///
/// `top`/`bottom` are the largest/smallest values of the type, join is `max`
/// and meet is `min`. For `bool`, `false < true`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Natural;

impl Lattice<bool> for Natural {
    fn bottom(&self) -> bool {
        false
    }
    fn top(&self) -> bool {
        true
    }
    fn least_upper_bound(&self, x: &bool, y: &bool) -> bool {
        *x || *y
    }
    fn greatest_lower_bound(&self, x: &bool, y: &bool) -> bool {
        *x && *y
    }
    fn compare(&self, x: &bool, y: &bool) -> LatticeOrd {
        x.cmp(y).into()
    }
    fn equal(&self, x: &bool, y: &bool) -> bool {
        x == y
    }
    fn hash(&self, x: &bool) -> u64 {
        *x as u64
    }
}

macro_rules! natural_integer {
    ($($t:ty),*) => {
        $(
            impl Lattice<$t> for Natural {
                fn bottom(&self) -> $t {
                    <$t>::MIN
                }
                fn top(&self) -> $t {
                    <$t>::MAX
                }
                fn least_upper_bound(&self, x: &$t, y: &$t) -> $t {
                    *x.max(y)
                }
                fn greatest_lower_bound(&self, x: &$t, y: &$t) -> $t {
                    *x.min(y)
                }
                fn compare(&self, x: &$t, y: &$t) -> LatticeOrd {
                    x.cmp(y).into()
                }
                fn equal(&self, x: &$t, y: &$t) -> bool {
                    x == y
                }
                fn hash(&self, x: &$t) -> u64 {
                    mhash(*x as i64 as u64)
                }
            }
        )*
    };
}

natural_integer!(i32, i64);

macro_rules! natural_float {
    ($($t:ty),*) => {
        $(
            impl Lattice<$t> for Natural {
                fn bottom(&self) -> $t {
                    <$t>::MIN
                }
                fn top(&self) -> $t {
                    <$t>::MAX
                }
                fn least_upper_bound(&self, x: &$t, y: &$t) -> $t {
                    x.max(*y)
                }
                fn greatest_lower_bound(&self, x: &$t, y: &$t) -> $t {
                    x.min(*y)
                }
                fn compare(&self, x: &$t, y: &$t) -> LatticeOrd {
                    match x.partial_cmp(y) {
                        Some(ord) => ord.into(),
                        None if x.is_nan() && y.is_nan() => LatticeOrd::Equal,
                        None => LatticeOrd::Unordered,
                    }
                }
                fn equal(&self, x: &$t, y: &$t) -> bool {
                    // all NaNs form one terminal
                    x == y || (x.is_nan() && y.is_nan())
                }
                fn hash(&self, x: &$t) -> u64 {
                    // -0.0 == 0.0, so both must hash the same
                    let x = if *x == 0.0 {
                        0.0
                    } else if x.is_nan() {
                        f64::NAN
                    } else {
                        *x as f64
                    };
                    mhash(x.to_bits())
                }
            }
        )*
    };
}

natural_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(LatticeOrd::Less.flip(), LatticeOrd::Greater);
        assert_eq!(LatticeOrd::Greater.flip(), LatticeOrd::Less);
        assert_eq!(LatticeOrd::Equal.flip(), LatticeOrd::Equal);
        assert_eq!(LatticeOrd::Unordered.flip(), LatticeOrd::Unordered);
    }

    #[test]
    fn test_and() {
        use LatticeOrd::*;
        for x in [Equal, Less, Greater, Unordered] {
            assert_eq!(Equal & x, x);
            assert_eq!(x & Equal, x);
            assert_eq!(Unordered & x, Unordered);
            assert_eq!(x & Unordered, Unordered);
        }
        assert_eq!(Less & Less, Less);
        assert_eq!(Greater & Greater, Greater);
        assert_eq!(Less & Greater, Unordered);
        assert_eq!(Greater & Less, Unordered);
    }

    #[test]
    fn test_or() {
        use LatticeOrd::*;
        for x in [Equal, Less, Greater, Unordered] {
            assert_eq!(Equal | x, x);
            assert_eq!(x | Equal, x);
        }
        assert_eq!(Unordered | Less, Less);
        assert_eq!(Greater | Unordered, Greater);
        assert_eq!(Unordered | Unordered, Unordered);
        assert_eq!(Less | Greater, Equal);
    }

    #[test]
    fn test_bool_lattice() {
        let l = Natural;
        assert!(!Lattice::<bool>::bottom(&l));
        assert!(Lattice::<bool>::top(&l));
        assert!(l.least_upper_bound(&true, &false));
        assert!(!l.greatest_lower_bound(&true, &false));
        assert_eq!(l.compare(&false, &true), LatticeOrd::Less);
        assert_eq!(l.compare(&true, &false), LatticeOrd::Greater);
        assert_eq!(l.compare(&true, &true), LatticeOrd::Equal);
        assert_ne!(Lattice::<bool>::hash(&l, &true), Lattice::<bool>::hash(&l, &false));
    }

    #[test]
    fn test_integer_lattice() {
        let l = Natural;
        assert_eq!(Lattice::<i32>::bottom(&l), i32::MIN);
        assert_eq!(Lattice::<i64>::top(&l), i64::MAX);
        assert_eq!(l.least_upper_bound(&3i32, &-7), 3);
        assert_eq!(l.greatest_lower_bound(&3i64, &-7), -7);
        assert_eq!(l.compare(&-1i32, &1), LatticeOrd::Less);
        assert!(l.equal(&5i64, &5));
        assert_eq!(Lattice::<i32>::hash(&l, &5), Lattice::<i32>::hash(&l, &5));
    }

    #[test]
    fn test_float_lattice() {
        let l = Natural;
        assert_eq!(Lattice::<f64>::bottom(&l), f64::MIN);
        assert_eq!(Lattice::<f32>::top(&l), f32::MAX);
        assert_eq!(l.least_upper_bound(&0.5f64, &1.5), 1.5);
        assert_eq!(l.greatest_lower_bound(&0.5f32, &1.5), 0.5);
        assert_eq!(l.compare(&f64::NAN, &1.0), LatticeOrd::Unordered);
        assert_eq!(Lattice::<f64>::hash(&l, &0.0), Lattice::<f64>::hash(&l, &-0.0));
    }

    #[test]
    fn test_float_nan_is_one_class() {
        let l = Natural;
        let other = f64::from_bits(f64::NAN.to_bits() | 1);
        assert!(other.is_nan());
        assert!(l.equal(&f64::NAN, &other));
        assert!(l.equal(&f32::NAN, &-f32::NAN));
        assert!(!l.equal(&f64::NAN, &0.0));
        assert_eq!(Lattice::<f64>::hash(&l, &f64::NAN), Lattice::<f64>::hash(&l, &other));
        assert_eq!(Lattice::<f32>::hash(&l, &f32::NAN), Lattice::<f32>::hash(&l, &-f32::NAN));
        assert_eq!(l.compare(&f64::NAN, &other), LatticeOrd::Equal);
        assert_eq!(l.compare(&f64::NAN, &1.0), LatticeOrd::Unordered);
    }

    #[test]
    fn test_ord_conversion() {
        assert_eq!(Option::<Ordering>::from(LatticeOrd::Unordered), None);
        assert_eq!(Option::<Ordering>::from(LatticeOrd::Less), Some(Ordering::Less));
        assert_eq!(LatticeOrd::from(Ordering::Greater), LatticeOrd::Greater);
    }
}
