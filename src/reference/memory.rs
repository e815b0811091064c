//! In-memory reference genome
//!
//! Holds whole chromosomes as uppercase ASCII strings, one byte per base.
//! Suitable for tests, small targeted references, and anything that has
//! already been fetched in bulk.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::error::PanelError;
use crate::reference::provider::RefGenome;
use crate::region::GenomicInterval;

/// Reference genome backed by chromosome strings
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenome {
    chromosomes: BTreeMap<String, String>,
}

impl InMemoryGenome {
    /// Create an empty genome
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a chromosome; bases are uppercased
    ///
    /// Non-ASCII characters are stored as `N`.
    pub fn add_chromosome(&mut self, name: impl Into<String>, sequence: impl AsRef<str>) {
        let name = name.into();
        let sequence = sequence.as_ref();
        let bases: String = if sequence.is_ascii() {
            sequence.to_ascii_uppercase()
        } else {
            warn!("Non-ASCII bases in {} stored as N", name);
            sequence
                .chars()
                .map(|c| if c.is_ascii() { c.to_ascii_uppercase() } else { 'N' })
                .collect()
        };
        self.chromosomes.insert(name, bases);
    }

    /// Builder-style [`add_chromosome`](Self::add_chromosome)
    pub fn with_chromosome(mut self, name: impl Into<String>, sequence: impl AsRef<str>) -> Self {
        self.add_chromosome(name, sequence);
        self
    }

    /// Load every record of a (multi-line) FASTA file into memory
    ///
    /// The record name is the first whitespace-delimited token of the header.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, on sequence before the first header, and on
    /// sequence lines containing non-ASCII characters.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self, PanelError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut genome = Self::new();

        let mut name: Option<String> = None;
        let mut sequence = String::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                if let Some(previous) = name.take() {
                    genome.add_chromosome(previous, &sequence);
                }
                sequence.clear();
                let record = header.split_whitespace().next().unwrap_or_default();
                if record.is_empty() {
                    warn!("Unnamed FASTA record in {}", path.display());
                }
                name = Some(record.to_string());
            } else if !line.is_empty() {
                if name.is_none() {
                    return Err(PanelError::Io {
                        msg: format!("{}: sequence data before first header", path.display()),
                    });
                }
                if !line.is_ascii() {
                    return Err(PanelError::InvalidSequence {
                        msg: format!(
                            "{}:{}: non-ASCII sequence data",
                            path.display(),
                            index + 1
                        ),
                    });
                }
                sequence.push_str(line);
            }
        }
        if let Some(previous) = name {
            genome.add_chromosome(previous, &sequence);
        }

        debug!(
            "Loaded {} chromosomes from {}",
            genome.chromosomes.len(),
            path.display()
        );
        Ok(genome)
    }

    /// Chromosome names in sorted order
    pub fn chromosome_names(&self) -> impl Iterator<Item = &str> {
        self.chromosomes.keys().map(String::as_str)
    }

    fn chromosome(&self, name: &str) -> Result<&str, PanelError> {
        self.chromosomes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PanelError::ChromosomeNotFound {
                chromosome: name.to_string(),
            })
    }
}

impl RefGenome for InMemoryGenome {
    fn chromosome_length(&self, chromosome: &str) -> Result<i64, PanelError> {
        Ok(self.chromosome(chromosome)?.len() as i64)
    }

    fn bases(&self, region: &GenomicInterval) -> Result<String, PanelError> {
        let sequence = self.chromosome(region.chromosome())?;
        let length = sequence.len() as i64;
        if region.end() > length {
            return Err(PanelError::RegionOutOfBounds {
                chromosome: region.chromosome().to_string(),
                start: region.start(),
                end: region.end(),
                length,
            });
        }
        let start = (region.start() - 1) as usize;
        let end = region.end() as usize;
        Ok(sequence[start..end].to_string())
    }

    fn has_chromosome(&self, chromosome: &str) -> bool {
        self.chromosomes.contains_key(chromosome)
    }
}
