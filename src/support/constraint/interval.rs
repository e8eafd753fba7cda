use std::{cmp::Ordering, marker::PhantomData};

use uom::si::{f64::Ratio, ratio::ratio};

use super::{Constrained, Constraint, ConstraintError};

/// Supplies the endpoints of an interval for values of type `T`.
///
/// Implementations must ensure `lower() ≤ upper()` under `T`'s `PartialOrd`.
pub trait IntervalBounds<T> {
    fn lower() -> T;
    fn upper() -> T;
}

/// Bounds of the unit interval, `0` and `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitBounds;

/// Bounds of an azimuthal stiffness ratio, `0` and `2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StiffnessBounds;

impl IntervalBounds<f64> for UnitBounds {
    fn lower() -> f64 {
        0.0
    }
    fn upper() -> f64 {
        1.0
    }
}

impl IntervalBounds<f64> for StiffnessBounds {
    fn lower() -> f64 {
        0.0
    }
    fn upper() -> f64 {
        2.0
    }
}

impl<B: IntervalBounds<f64>> IntervalBounds<Ratio> for B {
    fn lower() -> Ratio {
        Ratio::new::<ratio>(<B as IntervalBounds<f64>>::lower())
    }
    fn upper() -> Ratio {
        Ratio::new::<ratio>(<B as IntervalBounds<f64>>::upper())
    }
}

/// Marker type enforcing `lower ≤ x ≤ upper` for the bounds `B`.
///
/// # Examples
///
/// ```
/// use focus_cliff::support::constraint::{ClosedInterval, StiffnessBounds};
///
/// let k = ClosedInterval::<StiffnessBounds>::new(0.78).unwrap();
/// assert_eq!(k.into_inner(), 0.78);
///
/// assert!(ClosedInterval::<StiffnessBounds>::new(2.0).is_ok());
/// assert!(ClosedInterval::<StiffnessBounds>::new(2.01).is_err());
/// assert!(ClosedInterval::<StiffnessBounds>::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClosedInterval<B>(PhantomData<B>);

impl<B> ClosedInterval<B> {
    /// Constructs `Constrained<T, ClosedInterval<B>>` if the value lies within the bounds.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than the lower bound.
    /// - [`ConstraintError::AboveMaximum`] if greater than the upper bound.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T>(value: T) -> Result<Constrained<T, ClosedInterval<B>>, ConstraintError>
    where
        T: PartialOrd,
        B: IntervalBounds<T>,
    {
        Constrained::<T, ClosedInterval<B>>::new(value)
    }
}

impl<T: PartialOrd, B: IntervalBounds<T>> Constraint<T> for ClosedInterval<B> {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (
            value.partial_cmp(&<B as IntervalBounds<T>>::lower()),
            value.partial_cmp(&<B as IntervalBounds<T>>::upper()),
        ) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

/// Marker type enforcing `lower ≤ x < upper` for the bounds `B`.
///
/// # Examples
///
/// ```
/// use focus_cliff::support::constraint::{UnitBounds, UpperOpenInterval};
///
/// assert!(UpperOpenInterval::<UnitBounds>::new(0.0).is_ok());
/// assert!(UpperOpenInterval::<UnitBounds>::new(0.05).is_ok());
/// assert!(UpperOpenInterval::<UnitBounds>::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UpperOpenInterval<B>(PhantomData<B>);

impl<B> UpperOpenInterval<B> {
    /// Constructs `Constrained<T, UpperOpenInterval<B>>` if the value lies within the bounds.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than the lower bound.
    /// - [`ConstraintError::AboveMaximum`] if greater than or equal to the upper bound.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T>(value: T) -> Result<Constrained<T, UpperOpenInterval<B>>, ConstraintError>
    where
        T: PartialOrd,
        B: IntervalBounds<T>,
    {
        Constrained::<T, UpperOpenInterval<B>>::new(value)
    }
}

impl<T: PartialOrd, B: IntervalBounds<T>> Constraint<T> for UpperOpenInterval<B> {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (
            value.partial_cmp(&<B as IntervalBounds<T>>::lower()),
            value.partial_cmp(&<B as IntervalBounds<T>>::upper()),
        ) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater | Ordering::Equal)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stiffness_endpoints_are_inclusive() {
        assert!(ClosedInterval::<StiffnessBounds>::new(0.0).is_ok());
        assert!(ClosedInterval::<StiffnessBounds>::new(2.0).is_ok());
        assert!(matches!(
            ClosedInterval::<StiffnessBounds>::new(-1e-12),
            Err(ConstraintError::BelowMinimum)
        ));
        assert!(matches!(
            ClosedInterval::<StiffnessBounds>::new(2.0 + 1e-12),
            Err(ConstraintError::AboveMaximum)
        ));
        assert!(matches!(
            ClosedInterval::<StiffnessBounds>::new(f64::INFINITY),
            Err(ConstraintError::AboveMaximum)
        ));
    }

    #[test]
    fn stiffness_ratio_quantities() {
        assert!(ClosedInterval::<StiffnessBounds>::new(Ratio::new::<ratio>(0.81)).is_ok());
        assert!(matches!(
            ClosedInterval::<StiffnessBounds>::new(Ratio::new::<ratio>(2.5)),
            Err(ConstraintError::AboveMaximum)
        ));
    }

    #[test]
    fn upper_open_excludes_upper_bound() {
        assert!(UpperOpenInterval::<UnitBounds>::new(0.999).is_ok());
        assert!(matches!(
            UpperOpenInterval::<UnitBounds>::new(1.0),
            Err(ConstraintError::AboveMaximum)
        ));
        assert!(matches!(
            UpperOpenInterval::<UnitBounds>::new(-0.1),
            Err(ConstraintError::BelowMinimum)
        ));
    }

    #[test]
    fn nan_is_not_a_number() {
        assert!(matches!(
            ClosedInterval::<UnitBounds>::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        ));
        assert!(matches!(
            UpperOpenInterval::<UnitBounds>::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        ));
    }
}
