use serde::{Deserialize, Serialize};

/// Static reference entity for one tradable company. The roster is fixed at
/// startup and immutable for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub abbr: String,
    pub start_price: f64,
}

impl Company {
    pub fn new(name: &str, abbr: &str, start_price: f64) -> Self {
        Self {
            name: name.to_string(),
            abbr: abbr.to_string(),
            start_price,
        }
    }
}

/// The 2008-era roster the game ships with.
pub fn default_roster() -> Vec<Company> {
    vec![
        Company::new("Apple", "AAPL", 150.25),
        Company::new("Microsoft", "MSFT", 299.10),
        Company::new("Google", "GOOG", 750.50),
        Company::new("Amazon", "AMZN", 700.75),
        Company::new("Tesla", "TSLA", 720.30),
        Company::new("Netflix", "NFLX", 590.15),
        Company::new("Facebook", "FB", 355.40),
        Company::new("Nvidia", "NVDA", 220.80),
        Company::new("Intel", "INTC", 55.60),
        Company::new("Adobe", "ADBE", 630.20),
        Company::new("IBM", "IBM", 140.20),
        Company::new("Oracle", "ORCL", 85.50),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_has_unique_names_and_positive_prices() {
        let roster = default_roster();
        assert_eq!(roster.len(), 12);
        for (i, c) in roster.iter().enumerate() {
            assert!(c.start_price > 0.0, "{} has non-positive price", c.name);
            assert!(
                roster[i + 1..].iter().all(|other| other.name != c.name),
                "duplicate name {}",
                c.name
            );
        }
    }
}
