use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use emergency_assist::api::{start_server, ApiContext};
use emergency_assist::config::{self, ResponderConfig};
use emergency_assist::db::{self, open_database};
use emergency_assist::detection::{
    FixedSensor, ScriptedVoice, SensorMonitor, SilentVoice, SimulatedSensor, VoiceSource,
};
use emergency_assist::hospital::rank_hospitals;
use emergency_assist::models::Incident;
use emergency_assist::protocol::{build_notifier, run_and_record, EmergencyProtocol, ProtocolServices};

mod cli;

use cli::{Cli, Commands, PatientAction};

fn main() -> Result<()> {
    emergency_assist::init_tracing();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    let load = || {
        config::load_or_default(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))
    };

    match cli.command {
        Commands::InitConfig { force } => init_config(&config_path, force),
        Commands::Run { transcript, sensor, sensor_probability, seed, patient } => {
            let config = load()?;
            let services = services(&config, seed)?;
            let mut conn = open_db(&config)?;

            let patient = match patient {
                Some(id) => db::get_patient(&conn, &id)?
                    .with_context(|| format!("no stored patient with id {id}"))?,
                None => config.patient.clone(),
            };

            let voice: Box<dyn VoiceSource> = match transcript {
                Some(text) => Box::new(ScriptedVoice::new(text)),
                None => Box::new(SilentVoice),
            };
            let sensor: Box<dyn SensorMonitor> = match sensor_probability {
                Some(p) => Box::new(SimulatedSensor::new(p, seed.unwrap_or_else(rand::random))),
                None => Box::new(FixedSensor(sensor)),
            };

            let protocol = EmergencyProtocol::new(&config, &services);
            let report = run_and_record(&mut conn, &protocol, &patient, voice.as_ref(), sensor.as_ref())?;
            print_json(&report)
        }
        Commands::Triage { text } => {
            let config = load()?;
            let services = services(&config, None)?;
            let assessment = services.analyzer.analyze(&text, &config.patient.medical_history);
            print_json(&assessment)
        }
        Commands::Rank { seed } => {
            let config = load()?;
            let services = services(&config, seed)?;
            let ranking = rank_hospitals(
                config.patient.coordinates,
                &config.hospitals,
                services.availability.as_ref(),
                services.traffic.as_ref(),
                &config.weights,
            );
            print_json(&ranking)
        }
        Commands::Incidents { limit } => {
            let config = load()?;
            let conn = open_db(&config)?;
            let outcomes = db::outcome_tally(&conn)?
                .into_iter()
                .map(|(outcome, count)| (outcome.as_str(), count))
                .collect();
            print_json(&IncidentListing {
                outcomes,
                incidents: db::list_recent_incidents(&conn, limit)?,
            })
        }
        Commands::Patient { action } => {
            let config = load()?;
            let conn = open_db(&config)?;
            match action {
                PatientAction::Save => {
                    db::save_patient(&conn, &config.patient)?;
                    println!("Saved patient {} ({})", config.patient.name, config.patient.id);
                    Ok(())
                }
                PatientAction::List => print_json(&db::list_patients(&conn)?),
            }
        }
        Commands::Serve { addr, seed } => {
            let config = load()?;
            let services = services(&config, seed)?;
            let conn = open_db(&config)?;
            // The blocking webhook client must be dropped outside the runtime.
            let _services_guard = services.clone();
            let ctx = ApiContext::new(config, services, conn);

            let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
            runtime.block_on(async move {
                let mut server = start_server(ctx, addr)
                    .await
                    .with_context(|| format!("binding {addr}"))?;
                println!("Listening on http://{}", server.session.server_addr);

                tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
                server.shutdown();
                server.wait().await;
                Ok::<(), anyhow::Error>(())
            })
        }
    }
}

fn services(config: &ResponderConfig, seed: Option<u64>) -> Result<ProtocolServices> {
    let notifier = build_notifier(&config.notifier).context("building notifier")?;
    Ok(ProtocolServices::simulated(seed.unwrap_or_else(rand::random), notifier))
}

fn open_db(config: &ResponderConfig) -> Result<rusqlite::Connection> {
    let path = config.database_path();
    open_database(&path).with_context(|| format!("opening database {}", path.display()))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::save_config(path, &ResponderConfig::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// `incidents` command output: per-outcome totals plus the recent log.
#[derive(Serialize)]
struct IncidentListing {
    outcomes: BTreeMap<&'static str, u32>,
    incidents: Vec<Incident>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
