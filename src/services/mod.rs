pub mod color_difference;
pub mod color_space;
pub mod grouping;
pub mod pairing;
pub mod sampling;
pub mod shade_scoring;
pub mod tone;
