//! Writes a deterministic synthetic `global_cancer_patients_2015_2024.csv`
//! with the columns the cancer dashboard expects.

use anyhow::{Context, Result};
use serde::Serialize;

const OUTPUT_PATH: &str = "global_cancer_patients_2015_2024.csv";
const PATIENTS: usize = 50_000;

const COUNTRIES: &[&str] = &[
    "Australia", "Brazil", "Canada", "China", "Germany", "India", "Pakistan", "Russia", "UK", "USA",
];
const GENDERS: &[&str] = &["Female", "Male", "Other"];

/// (cancer type, base treatment cost in USD)
const CANCER_TYPES: &[(&str, f64)] = &[
    ("Breast", 42_000.0),
    ("Cervical", 38_000.0),
    ("Colon", 55_000.0),
    ("Leukemia", 71_000.0),
    ("Liver", 63_000.0),
    ("Lung", 67_000.0),
    ("Prostate", 36_000.0),
    ("Skin", 21_000.0),
];

/// (stage, survival multiplier, cost multiplier)
const STAGES: &[(&str, f64, f64)] = &[
    ("Stage 0", 1.0, 0.6),
    ("Stage I", 0.85, 0.8),
    ("Stage II", 0.65, 1.0),
    ("Stage III", 0.45, 1.3),
    ("Stage IV", 0.25, 1.7),
];

#[derive(Serialize)]
struct Patient {
    #[serde(rename = "Patient_ID")]
    patient_id: String,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "Country_Region")]
    country_region: &'static str,
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Genetic_Risk")]
    genetic_risk: f64,
    #[serde(rename = "Air_Pollution")]
    air_pollution: f64,
    #[serde(rename = "Alcohol_Use")]
    alcohol_use: f64,
    #[serde(rename = "Smoking")]
    smoking: f64,
    #[serde(rename = "Obesity_Level")]
    obesity_level: f64,
    #[serde(rename = "Cancer_Type")]
    cancer_type: &'static str,
    #[serde(rename = "Cancer_Stage")]
    cancer_stage: &'static str,
    #[serde(rename = "Treatment_Cost_USD")]
    treatment_cost_usd: f64,
    #[serde(rename = "Survival_Years")]
    survival_years: f64,
    #[serde(rename = "Target_Severity_Score")]
    target_severity_score: f64,
}

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Uniform in `[low, high)`, rounded to one decimal like the source data.
    fn score(&mut self, low: f64, high: f64) -> f64 {
        ((low + self.next_f64() * (high - low)) * 10.0).round() / 10.0
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn patient(i: usize, rng: &mut SimpleRng) -> Patient {
    let &(cancer_type, base_cost) = rng.pick(CANCER_TYPES);
    let &(cancer_stage, survival_factor, cost_factor) = rng.pick(STAGES);

    let genetic_risk = rng.score(0.0, 10.0);
    let air_pollution = rng.score(0.0, 10.0);
    let alcohol_use = rng.score(0.0, 10.0);
    let smoking = rng.score(0.0, 10.0);
    let obesity_level = rng.score(0.0, 10.0);

    let cost = (rng.gauss(base_cost * cost_factor, base_cost * 0.25)).max(5_000.0);
    let survival = (rng.gauss(10.0 * survival_factor, 1.5)).clamp(0.0, 10.0);
    let severity = (genetic_risk * 0.2
        + air_pollution * 0.15
        + alcohol_use * 0.15
        + smoking * 0.25
        + obesity_level * 0.1
        + (1.0 - survival_factor) * 3.0)
        .min(10.0);

    Patient {
        patient_id: format!("PT{i:07}"),
        age: 20 + (rng.next_u64() % 70) as u32,
        gender: *rng.pick(GENDERS),
        country_region: *rng.pick(COUNTRIES),
        year: 2015 + (rng.next_u64() % 10) as u32,
        genetic_risk,
        air_pollution,
        alcohol_use,
        smoking,
        obesity_level,
        cancer_type,
        cancer_stage,
        treatment_cost_usd: (cost * 100.0).round() / 100.0,
        survival_years: (survival * 10.0).round() / 10.0,
        target_severity_score: (severity * 100.0).round() / 100.0,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;

    for i in 0..PATIENTS {
        writer
            .serialize(patient(i, &mut rng))
            .with_context(|| format!("writing patient {i}"))?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {PATIENTS} patients to {OUTPUT_PATH}");
    Ok(())
}
