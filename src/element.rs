use core::fmt;
use std::ops::AddAssign;

use num_traits::{One, Zero};
use rand::Rng;

/// Value types the stencil accumulates over
pub trait Element:
    Copy + Zero + One + AddAssign + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Short name used in benchmark ids
    const NAME: &'static str;

    /// Draw a value small enough that a 27-term sum cannot overflow
    fn sample<R: Rng>(rng: &mut R) -> Self;
}

macro_rules! impl_element_int {
    ($($t:ty => $name:expr),* $(,)?) => {
        $(
            impl Element for $t {
                const NAME: &'static str = $name;

                fn sample<R: Rng>(rng: &mut R) -> Self {
                    rng.random_range(-100..=100)
                }
            }
        )*
    };
}

macro_rules! impl_element_float {
    ($($t:ty => $name:expr),* $(,)?) => {
        $(
            impl Element for $t {
                const NAME: &'static str = $name;

                fn sample<R: Rng>(rng: &mut R) -> Self {
                    rng.random_range(-1.0..1.0)
                }
            }
        )*
    };
}

impl_element_int!(i32 => "int", i64 => "long");
impl_element_float!(f32 => "float", f64 => "double");

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let i = i32::sample(&mut rng);
            assert!((-100..=100).contains(&i));
            let f = f64::sample(&mut rng);
            assert!((-1.0..1.0).contains(&f));
        }
    }

    #[test]
    fn names() {
        assert_eq!(i32::NAME, "int");
        assert_eq!(f32::NAME, "float");
        assert_eq!(f64::NAME, "double");
    }
}
