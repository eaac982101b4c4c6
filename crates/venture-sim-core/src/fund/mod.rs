pub mod monte_carlo;
pub mod outcomes;
pub mod params;
pub mod simulate;
