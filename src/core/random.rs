use rand::Rng;

/// Source of uniform values in `[0, 1)`. Seeding is the caller's concern.
pub trait RandomSource {
    fn uniform(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}
