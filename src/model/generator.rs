//! Dataset Generator
//!
//! Produces the initial unsorted sequence for a run.

use rand::Rng;
use std::fmt::Display;

use super::{Color, Element, Sequence};
use crate::error::{Result, SortError};

pub const MIN_MAGNITUDE: u32 = 1;
pub const MAX_MAGNITUDE: u32 = 100;

/// Generate `size` random elements using the thread-local RNG
pub fn generate<N>(size: N) -> Result<Sequence>
where
    N: TryInto<usize> + Copy + Display,
{
    generate_with(&mut rand::thread_rng(), size)
}

/// Generate `size` random elements from an explicit random source.
///
/// Magnitudes are uniform over `MIN_MAGNITUDE..=MAX_MAGNITUDE` and every
/// element gets an independently drawn color.
pub fn generate_with<R, N>(rng: &mut R, size: N) -> Result<Sequence>
where
    R: Rng + ?Sized,
    N: TryInto<usize> + Copy + Display,
{
    let len = match size.try_into() {
        Ok(n) if n > 0 => n,
        _ => return Err(SortError::InvalidSize(size.to_string())),
    };

    let elements = (0..len)
        .map(|_| {
            let magnitude = rng.gen_range(MIN_MAGNITUDE..=MAX_MAGNITUDE);
            let [r, g, b]: [u8; 3] = rng.gen();
            Element::new(magnitude, Color::rgb(r, g, b))
        })
        .collect();

    Ok(Sequence::new(elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_non_positive_sizes() {
        assert_eq!(generate(0), Err(SortError::InvalidSize("0".to_string())));
        assert_eq!(generate(-1), Err(SortError::InvalidSize("-1".to_string())));
    }

    #[test]
    fn test_magnitudes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let seq = generate_with(&mut rng, 500usize).unwrap();
        assert_eq!(seq.len(), 500);
        assert!(seq
            .magnitudes()
            .iter()
            .all(|m| (MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(m)));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_with(&mut StdRng::seed_from_u64(42), 50).unwrap();
        let b = generate_with(&mut StdRng::seed_from_u64(42), 50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_element() {
        let seq = generate(1).unwrap();
        assert_eq!(seq.len(), 1);
    }
}
