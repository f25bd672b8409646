//! Counters and timings of a run

use crate::output::print_key_value;
use serde_derive::Serialize;
use std::{fs, io};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub input_clauses: usize,
    pub proof_clauses: usize,
    pub skipped_deletions: usize,
    pub rat_clauses: usize,
    pub eliminated: usize,
    pub remaining_rat_clauses: usize,
    /// Resolvents created while distributing.
    pub resolvents: usize,
    /// Resolvents that were needed again in the same round.
    pub reused_resolvents: usize,
    /// Resolvents moved behind the RAT clause.
    pub relocated_resolvents: usize,
    /// Clauses dropped because they depend on a RAT clause.
    pub freed_clauses: usize,
    pub emitted_clauses: usize,
    pub aliases: usize,
    pub deleted_clauses: usize,
    pub parse_seconds: f64,
    pub pivot_seconds: f64,
    pub classification_seconds: f64,
    pub distribution_seconds: f64,
    pub finalization_seconds: f64,
    pub emission_seconds: f64,
}

impl Statistics {
    /// Print all values as comments.
    pub fn print(&self) {
        print_key_value("input clauses", self.input_clauses);
        print_key_value("proof clauses", self.proof_clauses);
        print_key_value("skipped deletions", self.skipped_deletions);
        print_key_value("RAT clauses", self.rat_clauses);
        print_key_value("eliminated RAT clauses", self.eliminated);
        print_key_value("remaining RAT clauses", self.remaining_rat_clauses);
        print_key_value("resolvents", self.resolvents);
        print_key_value("reused resolvents", self.reused_resolvents);
        print_key_value("relocated resolvents", self.relocated_resolvents);
        print_key_value("freed clauses", self.freed_clauses);
        print_key_value("emitted clauses", self.emitted_clauses);
        print_key_value("aliases", self.aliases);
        print_key_value("deleted clauses", self.deleted_clauses);
        for &(name, seconds) in &[
            ("parsing (s)", self.parse_seconds),
            ("pivot reconstruction (s)", self.pivot_seconds),
            ("classification (s)", self.classification_seconds),
            ("distribution (s)", self.distribution_seconds),
            ("finalization (s)", self.finalization_seconds),
            ("emission (s)", self.emission_seconds),
        ] {
            print_key_value(name, format!("{:.3}", seconds));
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Write the statistics to a TOML file.
    pub fn write_toml(&self, filename: &str) -> io::Result<()> {
        let text = self
            .to_toml()
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        fs::write(filename, text)
    }
}
