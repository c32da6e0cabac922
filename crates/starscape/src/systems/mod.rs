pub mod parallax;
pub mod rng;
pub mod shooting_stars;
