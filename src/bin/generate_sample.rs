use std::collections::BTreeMap;
use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use flate2::write::GzEncoder;
use flate2::Compression;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i32 = 1880;
const LAST_YEAR: i32 = 2017;

/// Popularity curve: (name, sex, peak year, width in years, peak count).
const NAMES: &[(&str, &str, f64, f64, f64)] = &[
    ("Mary", "F", 1915.0, 30.0, 70000.0),
    ("Anna", "F", 1890.0, 25.0, 15000.0),
    ("Linda", "F", 1950.0, 8.0, 99000.0),
    ("Jennifer", "F", 1975.0, 7.0, 63000.0),
    ("Jessica", "F", 1988.0, 8.0, 51000.0),
    ("Emma", "F", 2010.0, 12.0, 22000.0),
    ("Alison", "F", 1985.0, 12.0, 4000.0),
    ("Allison", "F", 1995.0, 12.0, 8000.0),
    ("Allyson", "F", 1993.0, 8.0, 1500.0),
    ("Alyson", "F", 1990.0, 8.0, 900.0),
    ("Alisonne", "F", 1970.0, 5.0, 40.0),
    ("John", "M", 1920.0, 35.0, 80000.0),
    ("William", "M", 1915.0, 40.0, 60000.0),
    ("Robert", "M", 1935.0, 18.0, 75000.0),
    ("James", "M", 1945.0, 25.0, 88000.0),
    ("Michael", "M", 1965.0, 15.0, 92000.0),
    ("Jacob", "M", 2002.0, 10.0, 35000.0),
    ("Noah", "M", 2014.0, 8.0, 19000.0),
    ("Mary", "M", 1915.0, 20.0, 400.0),
    ("John", "F", 1920.0, 20.0, 300.0),
];

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    year: i32,
    sex: &'static str,
    name: &'static str,
    n: i64,
    proportion: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for year in FIRST_YEAR..=LAST_YEAR {
        let mut year_rows: Vec<Row> = Vec::new();
        for &(name, sex, peak, width, amplitude) in NAMES {
            let expected = gaussian(year as f64, peak, width, amplitude);
            let n = rng.gauss(expected, expected.sqrt().max(1.0)).round() as i64;
            // The public tables drop names given fewer than five times.
            if n >= 5 {
                year_rows.push(Row { year, sex, name, n, proportion: 0.0 });
            }
        }

        let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
        for row in &year_rows {
            *totals.entry(row.sex).or_default() += row.n;
        }
        for row in &mut year_rows {
            row.proportion = row.n as f64 / totals[row.sex] as f64;
        }
        rows.extend(year_rows);
    }
    rows
}

fn write_csv_gz(rows: &[Row], path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = csv::Writer::from_writer(GzEncoder::new(file, Compression::default()));
    writer.write_record(["year", "sex", "name", "n", "proportion"])?;
    for row in rows {
        writer.write_record([
            row.year.to_string(),
            row.sex.to_string(),
            row.name.to_string(),
            row.n.to_string(),
            row.proportion.to_string(),
        ])?;
    }
    let encoder = writer.into_inner().map_err(|e| anyhow::anyhow!("{e}"))?;
    encoder.finish().context("finishing gzip stream")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("sex", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("n", DataType::Int64, false),
        Field::new("proportion", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.n))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.proportion))),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv_gz(&rows, "sample_names.csv.gz")?;
    write_parquet(&rows, "sample_names.parquet")?;

    println!(
        "Wrote {} rows ({FIRST_YEAR}-{LAST_YEAR}, {} name/sex curves) to sample_names.csv.gz and sample_names.parquet",
        rows.len(),
        NAMES.len()
    );
    Ok(())
}
