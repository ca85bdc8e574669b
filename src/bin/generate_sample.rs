use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

const FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Share of feature cells left blank.
const MISSING_RATE: f64 = 0.03;

fn main() {
    let mut rng = SimpleRng::new(42);

    // (species, [(mean, std); 4])
    let species: [(&str, [(f64, f64); 4]); 3] = [
        ("setosa", [(5.0, 0.35), (3.4, 0.38), (1.5, 0.17), (0.25, 0.1)]),
        ("versicolor", [(5.9, 0.52), (2.8, 0.31), (4.3, 0.47), (1.3, 0.2)]),
        ("virginica", [(6.6, 0.64), (3.0, 0.32), (5.6, 0.55), (2.0, 0.27)]),
    ];
    let rows_per_species = 40;

    let mut features: Vec<Vec<Option<f64>>> = vec![Vec::new(); FEATURES.len()];
    let mut labels: Vec<&str> = Vec::new();

    for (name, params) in &species {
        for _ in 0..rows_per_species {
            for (column, &(mean, std_dev)) in features.iter_mut().zip(params) {
                let value = (rng.gauss(mean, std_dev).max(0.1) * 10.0).round() / 10.0;
                let missing = rng.next_f64() < MISSING_RATE;
                column.push(if missing { None } else { Some(value) });
            }
            labels.push(*name);
        }
    }

    // Write CSV
    let csv_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    let mut header: Vec<&str> = FEATURES.to_vec();
    header.push("species");
    writer.write_record(&header).expect("Failed to write CSV header");
    for (row, label) in labels.iter().enumerate() {
        let mut record: Vec<String> = features
            .iter()
            .map(|c| c[row].map(|v| format!("{v:.1}")).unwrap_or_default())
            .collect();
        record.push(label.to_string());
        writer.write_record(&record).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let mut fields: Vec<Field> = FEATURES
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, true))
        .collect();
    fields.push(Field::new("species", DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = features
        .into_iter()
        .map(|c| Arc::new(Float64Array::from(c)) as ArrayRef)
        .collect();
    columns.push(Arc::new(StringArray::from(labels.clone())));

    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} rows of {} species to {csv_path} and {parquet_path}",
        labels.len(),
        species.len()
    );
}
