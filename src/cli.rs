//! CLI command definitions using clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// EmergencyAssist: triage, hospital matching and escalation
#[derive(Parser, Debug)]
#[command(name = "emergency-assist")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/EmergencyAssist/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the emergency protocol once and record the incident
    Run {
        /// What the patient said
        #[arg(short, long)]
        transcript: Option<String>,

        /// Report an automatic sensor trigger
        #[arg(long, default_value_t = false, conflicts_with = "sensor_probability")]
        sensor: bool,

        /// Simulate the sensor, firing with this probability
        #[arg(long)]
        sensor_probability: Option<f64>,

        /// Seed for the simulated hospital feeds
        #[arg(long)]
        seed: Option<u64>,

        /// Stored patient to run for (defaults to the configured patient)
        #[arg(short, long)]
        patient: Option<Uuid>,
    },

    /// Assess a symptom description
    Triage {
        /// Symptom description
        text: String,
    },

    /// Rank hospitals for the configured patient
    Rank {
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List recorded incidents, newest first
    Incidents {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Manage stored patient profiles
    Patient {
        #[command(subcommand)]
        action: PatientAction,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PatientAction {
    /// Store the configured patient in the database
    Save,
    /// List stored patients
    List,
}
