/// Price in hundredths of the upstream unit, as served to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Price(i64);

impl Price {
    const MULTIPLIER: i64 = 100;

    pub fn to_i64(&self) -> i64 {
        self.0
    }

    /// Scales by 100 and truncates toward zero.
    pub fn from_f64(value: f64) -> Self {
        Price((value * Self::MULTIPLIER as f64) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_truncates_toward_zero() {
        assert_eq!(Price::from_f64(10.50).to_i64(), 1050);
        assert_eq!(Price::from_f64(12.349).to_i64(), 1234);
        assert_eq!(Price::from_f64(-3.457).to_i64(), -345);
        assert_eq!(Price::from_f64(0.0).to_i64(), 0);
    }
}
