use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value as JsonValue, json};

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

/// GPS error profile: position noise, velocity fuzziness, plus a bit of
/// unrelated acceleration noise.
fn gps_error(pos: f64, vel_fuzz: f64, acc: f64) -> JsonValue {
    json!({
        "position": { "x": pos, "y": pos * 0.5, "z": 0.0 },
        "velocityFuzziness": { "x": 0.0, "y": vel_fuzz, "z": 0.0 },
        "acceleration": { "x": acc, "y": acc, "z": acc }
    })
}

/// Optimizer output loosely driven by the GPS error.
fn result(rng: &mut SimpleRng, pos: f64, vel_fuzz: f64, legacy: bool) -> JsonValue {
    let r_pos = 0.02 + 0.5 * pos + rng.gauss(0.0, 0.05);
    let mut out = json!({
        "rPosY": 0.02 + 0.25 * pos + rng.gauss(0.0, 0.05),
        "qVelocityY": 0.1 + 2.0 * vel_fuzz + rng.gauss(0.0, 0.1),
        "qAccelerationX": 0.5 + rng.gauss(0.0, 0.2),
        "score": rng.next_f64(),
    });
    if legacy {
        out["rPosXZ"] = json!(r_pos);
    } else {
        out["rPosX"] = json!(r_pos);
        out["rPosZ"] = json!(r_pos);
    }
    out
}

fn write_json(path: &Path, value: &JsonValue) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sample_data".into()));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let profiles = [
        (0.5, 0.1, 1.0),
        (1.0, 0.3, 0.2),
        (1.5, 0.2, 0.8),
        (2.0, 0.5, 0.4),
        (2.5, 0.4, 0.6),
        (3.0, 0.6, 0.1),
    ];
    let runs_per_sweep = 5;

    for (i, &(pos, vel_fuzz, acc)) in profiles.iter().enumerate() {
        // The oldest sweep still writes the combined XZ value.
        let legacy = i == 0;
        let results: Vec<JsonValue> = (0..runs_per_sweep)
            .map(|_| result(&mut rng, pos, vel_fuzz, legacy))
            .collect();
        let best = results[0].clone();
        let sweep = json!({
            "gpsError": gps_error(pos, vel_fuzz, acc),
            "results": results,
            "bestResult": best,
        });
        write_json(&out_dir.join(format!("sweep_{}.json", i + 1)), &sweep)?;
    }

    let sections: Vec<JsonValue> = (0..4)
        .map(|s| {
            let pos = 0.75 + s as f64 * 0.6;
            let vel_fuzz = 0.15 + s as f64 * 0.1;
            json!({
                "name": format!("{}-{}s", s * 60, (s + 1) * 60),
                "gpsError": gps_error(pos, vel_fuzz, 0.5),
                "bestResult": result(&mut rng, pos, vel_fuzz, false),
            })
        })
        .collect();
    write_json(
        &out_dir.join("section_sweep.json"),
        &json!({ "sections": sections }),
    )?;

    println!(
        "Wrote {} sweep summaries ({} runs each) and one section sweep to {}",
        profiles.len(),
        runs_per_sweep,
        out_dir.display()
    );
    Ok(())
}
