use std::sync::Arc;
use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::codec::{build_table, CodecTable};
use crate::keys::{derive_keys, generate_primes, KeyPair};
use crate::telemetry::{Stage, StageTimes};
use crate::types::EngineError;

/// Key pair and codec table for one run. The table is shared read-only with every worker.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    keys: KeyPair,
    table: Arc<CodecTable>,
}

impl KeyMaterial {
    /// Sieve, draw and build the table. A `seed` makes the draw reproducible.
    pub fn generate(bound: usize, seed: Option<u64>, times: &mut StageTimes) -> Result<Self, EngineError> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let start = Instant::now();
        let pool = generate_primes(bound)?;
        times.add(Stage::Sieve, start.elapsed());

        let start = Instant::now();
        let (keys, _rest) = derive_keys(pool, &mut rng)?;
        times.add(Stage::KeyDerive, start.elapsed());

        let start = Instant::now();
        let material = Self::from_keys(keys)?;
        times.add(Stage::TableBuild, start.elapsed());

        info!("[KEYGEN] n={} e={}", keys.n(), keys.e());
        Ok(material)
    }

    pub fn from_keys(keys: KeyPair) -> Result<Self, EngineError> {
        let table = build_table(&keys)?;
        Ok(Self { keys, table: Arc::new(table) })
    }

    pub fn keys(&self) -> &KeyPair {
        &self.keys
    }

    pub fn table(&self) -> &Arc<CodecTable> {
        &self.table
    }

    pub fn modulus(&self) -> u64 {
        self.keys.n()
    }
}
