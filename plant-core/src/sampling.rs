use glam::Vec3;
use rand::Rng;

/// Samples a point uniformly inside the unit ball.
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Samples a uniformly distributed direction.
///
/// Never returns a zero vector: samples too close to the origin to be
/// normalized reliably are rejected.
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len2 = p.length_squared();
        if len2 > 1e-6 {
            return p / len2.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn unit_sphere_samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5, "not normalized: {v:?}");
        }
    }

    #[test]
    fn unit_vectors_cover_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(3);
        let ups = (0..500)
            .filter(|_| random_unit_vector(&mut rng).y > 0.0)
            .count();
        assert!(ups > 150 && ups < 350, "suspicious hemisphere split: {ups}");
    }
}
