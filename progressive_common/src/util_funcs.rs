use glam::Vec2;
use rand::Rng;

/// A vector with both components drawn uniformly from `[0, 1)`.
pub fn random_vec2<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(rng.random::<f32>(), rng.random::<f32>())
}
