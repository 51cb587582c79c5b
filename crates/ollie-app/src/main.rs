use std::io::{self, Write};

use clap::Parser;
use ollie_core::{Event, Session};
use ollie_platform::{drive, EventSink, Result, ScriptedSource};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod script;

use crate::cli::Cli;

/// Fixed timestep used when synthesising the demo script.
const DEMO_DT: f32 = 1.0 / 60.0;

/// Writes every event except raw analog updates as one JSON object per line.
struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::AnalogUpdated { .. } => return Ok(()),
            Event::TrickExecuted { trick, duration } => {
                info!(trick, ?duration, "executed");
            }
            _ => {}
        }
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    info!("Ollie starting");
    if let Err(e) = run(cli) {
        eprintln!("Ollie error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let session = Session::from_toml_str(&script::read_text(&cli.session)?)?;
    info!(path = %cli.session.display(), tricks = session.catalog.len(), "session loaded");

    let samples = match cli.script.as_deref() {
        Some(path) => script::load_script(path)?,
        None => {
            info!("no script given; replaying demo");
            script::demo_script(&session.catalog, &session.durations, DEMO_DT)
        }
    };

    let mut matcher = session.matcher();
    let mut source = ScriptedSource::new(samples);
    let mut sink = JsonLinesSink { out: io::stdout() };
    let steps = drive(&mut matcher, &mut source, &mut sink)?;
    info!(steps, "replay finished");
    Ok(())
}
