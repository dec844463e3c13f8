//! Weighted-factor scores shared by the trade and alliance resolvers.

/// One named term of a weighted score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    pub name: &'static str,
    pub value: f64,
}

/// A score broken down into named factors, plus an unnamed constant base.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub base: f64,
    pub factors: Vec<Factor>,
}

impl Assessment {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            factors: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: f64) -> Self {
        self.factors.push(Factor { name, value });
        self
    }

    pub fn score(&self) -> f64 {
        self.base + self.factors.iter().map(|f| f.value).sum::<f64>()
    }

    /// Factors sorted by value, highest first. Equal values keep insertion order.
    pub fn ranked(&self) -> Vec<Factor> {
        let mut ranked = self.factors.clone();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked
    }

    pub fn top(&self) -> Option<Factor> {
        self.ranked().first().copied()
    }

    /// The lowest factor, only if it actually pulled the score down.
    pub fn most_negative(&self) -> Option<Factor> {
        self.ranked().last().copied().filter(|f| f.value < 0.0)
    }

    pub fn value_of(&self, name: &str) -> f64 {
        self.factors
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assessment {
        Assessment::new(0.1)
            .with("Trust Level", 0.2)
            .with("Aggression", -0.05)
            .with("Influence", 0.2)
    }

    #[test]
    fn score_sums_base_and_factors() {
        assert!((sample().score() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_insertion_order() {
        assert_eq!(sample().top().unwrap().name, "Trust Level");
    }

    #[test]
    fn most_negative_requires_a_negative_factor() {
        assert_eq!(sample().most_negative().unwrap().name, "Aggression");
        let positive = Assessment::new(0.0).with("Wealth", 0.1).with("Tech", -0.0);
        assert!(positive.most_negative().is_none());
    }
}
