/// Population mean and standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Statistics {
    pub mean: f64,
    /// `sqrt(sum((v - mean)^2) / N)`.
    pub std_dev: f64,
}

impl Statistics {
    /// Population statistics (divide by `N`). `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sq = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        Some(Self {
            mean,
            std_dev: (sq / n).sqrt(),
        })
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}
