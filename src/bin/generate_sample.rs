use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const RISK_FACTORS: [(&str, f64); 8] = [
    ("Outdoor air pollution", 9_000.0),
    ("High systolic blood pressure", 30_000.0),
    ("Smoking", 25_000.0),
    ("High fasting plasma glucose", 12_000.0),
    ("High body mass index", 11_000.0),
    ("Alcohol use", 6_000.0),
    ("Low physical activity", 3_000.0),
    ("Unsafe water source", 1_500.0),
];

const CAUSES: [(&str, f64); 8] = [
    ("Meningitis", 600.0),
    ("Malaria", 300.0),
    ("Cardiovascular Diseases", 60_000.0),
    ("Neoplasms", 45_000.0),
    ("Lower Respiratory Infections", 9_000.0),
    ("Diabetes Mellitus", 5_000.0),
    ("Chronic Kidney Disease", 4_000.0),
    ("Road Injuries", 3_500.0),
];

/// Country name, ISO code, population scale.
const COUNTRIES: [(&str, &str, f64); 6] = [
    ("Brazil", "BRA", 2.1),
    ("France", "FRA", 0.7),
    ("Germany", "DEU", 0.85),
    ("Japan", "JPN", 1.25),
    ("Nigeria", "NGA", 1.9),
    ("United States", "USA", 3.3),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Death count for one category of one country in one year: a base level
/// scaled by population with a slow per-category trend and 5% noise.
fn deaths(rng: &mut SimpleRng, base: f64, scale: f64, category_idx: usize, year: i32) -> u64 {
    let drift = 1.0 + (category_idx as f64 - 3.5) * 0.004 * f64::from(year - 1990);
    let value = base * scale * drift.max(0.2) * rng.gauss(1.0, 0.05).max(0.5);
    value.round().max(0.0) as u64
}

fn write_dataset(
    path: &Path,
    identifier: &str,
    categories: &[(&str, f64)],
    rng: &mut SimpleRng,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![identifier, "Code", "Year"];
    header.extend(categories.iter().map(|(name, _)| *name));
    writer.write_record(&header).context("writing header")?;

    let mut rows = 0;
    for (country, code, scale) in COUNTRIES {
        for year in 1990..=2019 {
            let mut record = vec![country.to_string(), code.to_string(), year.to_string()];
            for (i, (_, base)) in categories.iter().enumerate() {
                record.push(deaths(rng, *base, scale, i, year).to_string());
            }
            writer.write_record(&record).context("writing row")?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;
    Ok(rows)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let risk_path = out_dir.join("death rate of countries and its causes.csv");
    let rows = write_dataset(&risk_path, "Entity", &RISK_FACTORS, &mut rng)?;
    println!("Wrote {rows} risk-factor rows to {}", risk_path.display());

    let causes_path = out_dir.join("cause_of_deaths2.csv");
    let rows = write_dataset(&causes_path, "Country/Territory", &CAUSES, &mut rng)?;
    println!("Wrote {rows} cause-of-death rows to {}", causes_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortality_dash::data::loader::load;
    use mortality_dash::data::DatasetKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn written_files_load_with_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("causes.csv");
        let mut rng = SimpleRng::new(7);
        let rows = write_dataset(&path, "Country/Territory", &CAUSES, &mut rng).unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.kind(), DatasetKind::Causes);
        assert_eq!(table.len(), rows);
        assert_eq!(table.categories().len(), CAUSES.len());
        assert!(table.records().iter().all(|r| r.code.is_some()));
    }
}
